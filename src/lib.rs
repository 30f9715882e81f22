//! delve - Interactive client for graph query streams
//!
//! delve connects to a query server, sends query text, and renders the
//! resulting message stream as terminal output: nodes with properties and
//! tags, edit progress marks, warnings, and errors.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod history;
pub mod proto;
pub mod render;
pub mod repl;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export commonly used types
pub use config::{DelveConfig, Profile};
pub use history::{HistoryLog, QueryRecord};
pub use proto::{parse_message, Client, Message, MessageSource, QueryRequest, QueryStream};
pub use render::{Printer, RenderOpts, Renderer};
pub use repl::{parse_line, Command, Repl};
