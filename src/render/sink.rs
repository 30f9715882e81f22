//! Line-oriented output sink
//!
//! Progress marks accumulate on one line without newlines; any full line
//! printed afterwards first closes that run. [`Printer`] tracks the
//! mid-line state so render code never has to.

use std::io::{self, Write};

/// Output sink with mid-line tracking and a color switch.
///
/// Wraps any [`Write`], so the interactive client hands it stdout and tests
/// hand it a buffer.
#[derive(Debug)]
pub struct Printer<W> {
    out: W,
    color: bool,
    midline: bool,
}

impl<W: Write> Printer<W> {
    /// Create a printer over `out`. `color` enables ANSI styling.
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            midline: false,
        }
    }

    /// Whether styled output is enabled.
    #[must_use]
    pub fn color_enabled(&self) -> bool {
        self.color
    }

    /// Whether the cursor sits after unterminated progress marks.
    #[must_use]
    pub fn is_midline(&self) -> bool {
        self.midline
    }

    /// Print one full line, first closing any run of progress marks.
    pub fn print(&mut self, text: &str) -> io::Result<()> {
        self.close_marks()?;
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    /// Append progress marks to the current line, without a newline.
    ///
    /// Leaves the printer mid-line even for empty `text`, so a batch with
    /// nothing to show still separates itself from the next full line.
    pub fn marks(&mut self, text: &str) -> io::Result<()> {
        if !text.is_empty() {
            write!(self.out, "{text}")?;
            self.out.flush()?;
        }
        self.midline = true;
        Ok(())
    }

    /// Write the interactive prompt, leaving the cursor on its line.
    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        self.close_marks()?;
        write!(self.out, "{text}")?;
        self.out.flush()
    }

    /// Consume the printer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn close_marks(&mut self) -> io::Result<()> {
        if self.midline {
            writeln!(self.out)?;
            self.midline = false;
        }
        Ok(())
    }
}
