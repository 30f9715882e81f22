//! Terminal rendering for query streams
//!
//! Turns decoded [`Message`](crate::proto::Message) values into the text a
//! person watches during a query: node listings, edit progress dots, the
//! completion line, and warning or error reports. All writes go through
//! [`Printer`], which owns the one piece of state rendering needs, whether
//! the cursor sits mid-line after progress marks.

pub mod dispatch;
pub mod error;
pub mod node;
pub mod progress;
pub mod sink;

pub use dispatch::Renderer;
pub use error::{render_err, render_warn};
pub use node::render_node;
pub use progress::{render_edits, render_fini};
pub use sink::Printer;

/// Options controlling node rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOpts {
    /// Suppress the property lines under each node.
    pub hide_props: bool,
    /// Suppress the tag lines under each node.
    pub hide_tags: bool,
}
