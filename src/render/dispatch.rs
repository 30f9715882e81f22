//! Message dispatch
//!
//! Routes each decoded message to its renderer and reports whether the
//! stream should keep rendering.

use std::io::{self, Write};
use std::ops::ControlFlow;

use anyhow::{Context, Result};

use crate::proto::{Message, MessageSource};

use super::error::{render_err, render_warn};
use super::node::render_node;
use super::progress::{render_edits, render_fini};
use super::sink::Printer;
use super::RenderOpts;

/// Renders a stream of query messages to a printer.
#[derive(Debug)]
pub struct Renderer<W> {
    out: Printer<W>,
    opts: RenderOpts,
}

impl<W: Write> Renderer<W> {
    /// Create a renderer writing through `out`.
    pub fn new(out: Printer<W>, opts: RenderOpts) -> Self {
        Self { out, opts }
    }

    /// The underlying printer, for prompt and banner lines.
    pub fn printer(&mut self) -> &mut Printer<W> {
        &mut self.out
    }

    /// Consume the renderer and return the printer.
    pub fn into_printer(self) -> Printer<W> {
        self.out
    }

    /// Render one message. `Break` means rendering for this stream is done.
    pub fn render(&mut self, mesg: &Message) -> Result<ControlFlow<()>> {
        self.dispatch(mesg).context("Failed to write query output")
    }

    /// Drain `source`, rendering until it ends or rendering breaks.
    pub async fn render_stream<S: MessageSource>(&mut self, source: &mut S) -> Result<()> {
        while let Some(mesg) = source.next_message().await? {
            if self.render(&mesg)?.is_break() {
                break;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, mesg: &Message) -> io::Result<ControlFlow<()>> {
        match mesg {
            Message::Node(node) => render_node(&mut self.out, node, self.opts)?,
            Message::NodeEdits(summary) => render_edits(&mut self.out, summary)?,
            Message::Fini(stats) => render_fini(&mut self.out, *stats)?,
            Message::Print(info) => self.out.print(&info.mesg)?,
            Message::Warn(warn) => render_warn(&mut self.out, warn)?,
            Message::Err(err) => return render_err(&mut self.out, err),
        }
        Ok(ControlFlow::Continue(()))
    }
}
