//! Edit progress marks and the completion line

use std::io::{self, Write};

use colored::Colorize;

use crate::proto::{EditSummary, Stats};

use super::sink::Printer;

/// Render a batch of node edits as one dot per change, all on one line.
pub fn render_edits<W: Write>(out: &mut Printer<W>, summary: &EditSummary) -> io::Result<()> {
    let dots = ".".repeat(summary.change_count());
    if out.color_enabled() && !dots.is_empty() {
        out.marks(&dots.truecolor(173, 216, 230).to_string())
    } else {
        out.marks(&dots)
    }
}

/// Render the completion line for a finished query.
///
/// The elapsed time is clamped to a millisecond before use, so the rate is
/// always finite and a sub-millisecond query still shows `1 ms`.
pub fn render_fini<W: Write>(out: &mut Printer<W>, stats: Stats) -> io::Result<()> {
    let took = stats.took.max(1);
    let rate = u64::try_from(u128::from(stats.count) * 1000 / u128::from(took))
        .unwrap_or(u64::MAX);
    out.print(&format!(
        "complete. {} nodes in {took} ms ({rate}/sec).",
        stats.count
    ))
}
