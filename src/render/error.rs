//! Warning and error rendering
//!
//! Warnings and generic errors are single styled lines. A syntax error that
//! carries position info instead gets a three-line caret display and ends
//! the stream's rendering.

use std::io::{self, Write};
use std::ops::ControlFlow;

use colored::Colorize;

use crate::proto::message::value_repr;
use crate::proto::{ErrInfo, WarnInfo};

use super::sink::Printer;

const SYNTAX_ERROR_KIND: &str = "BadSyntax";

/// Render a warning line, appending extra payload fields as `key=value`.
pub fn render_warn<W: Write>(out: &mut Printer<W>, warn: &WarnInfo) -> io::Result<()> {
    let mut text = warn.mesg.clone();
    let extra = warn
        .extra
        .iter()
        .map(|(name, valu)| format!("{name}={}", value_repr(valu)))
        .collect::<Vec<_>>()
        .join(", ");
    if !extra.is_empty() {
        text = format!("{text} {extra}");
    }

    let line = format!("WARNING: {text}");
    if out.color_enabled() {
        out.print(&line.truecolor(244, 232, 66).to_string())
    } else {
        out.print(&line)
    }
}

/// Render an error report.
///
/// Returns `Break` when the error was a positioned syntax error, which ends
/// rendering for the stream; everything else is a one-line report and the
/// stream continues.
pub fn render_err<W: Write>(out: &mut Printer<W>, err: &ErrInfo) -> io::Result<ControlFlow<()>> {
    if err.kind == SYNTAX_ERROR_KIND {
        if let (Some(at), Some(text), Some(mesg)) =
            (err.at, err.text.as_deref(), err.mesg.as_deref())
        {
            let text = text.replace('\n', " ");
            let (window, caret) = syntax_window(&text, at);
            out.print(&window)?;
            out.print(&format!("{}^", " ".repeat(caret)))?;
            print_error_line(out, &format!("Syntax Error: {mesg}"))?;
            return Ok(ControlFlow::Break(()));
        }
    }

    // Anything else, including a syntax error missing position info, is a
    // plain one-liner and does not stop the stream.
    let text = err.mesg.as_deref().unwrap_or(&err.kind);
    print_error_line(out, &format!("ERROR: {text}"))?;
    Ok(ControlFlow::Continue(()))
}

fn print_error_line<W: Write>(out: &mut Printer<W>, line: &str) -> io::Result<()> {
    if out.color_enabled() {
        out.print(&line.truecolor(255, 0, 102).to_string())
    } else {
        out.print(line)
    }
}

/// Trim long query text to a window around the error position.
///
/// Text longer than 60 characters is cut to 30 characters either side of
/// the position, with `...` marking each trimmed end. When the left end is
/// trimmed the caret column is fixed just past its marker.
fn syntax_window(text: &str, at: usize) -> (String, usize) {
    let chars: Vec<char> = text.chars().collect();
    let tlen = chars.len();
    if tlen <= 60 {
        return (text.to_string(), at);
    }

    let end = at.saturating_add(30).min(tlen);
    let start = at.saturating_sub(30).min(end);
    let mut window: String = chars[start..end].iter().collect();

    let mut caret = at;
    if at < tlen - 30 {
        window.push_str("...");
    }
    if at > 30 {
        window = format!("...{window}");
        caret = 33;
    }

    (window, caret)
}
