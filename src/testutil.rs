//! Shared test utilities
//!
//! Common helpers used across test modules. Only compiled in test builds.

use crate::render::Printer;

/// Printer writing into an in-memory buffer, with colors disabled so
/// assertions see plain text.
#[must_use]
pub fn capture_printer() -> Printer<Vec<u8>> {
    Printer::new(Vec::new(), false)
}

/// The UTF-8 text a capture printer accumulated.
#[must_use]
pub fn printed(printer: Printer<Vec<u8>>) -> String {
    String::from_utf8(printer.into_inner()).expect("printer output was not UTF-8")
}
