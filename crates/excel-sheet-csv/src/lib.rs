//! # excel-sheet-csv
//!
//! CSV reader and writer for excel-sheet.
//!
//! The dialect is deliberately minimal: one line per row terminated by
//! `\n`, fields separated by a single `,`, UTF-8 text, and no quoting or
//! escaping in either direction. A value containing `,` or a line break
//! does not survive a round trip.

mod error;
mod reader;
mod writer;

pub use error::{CsvError, CsvResult};
pub use reader::CsvReader;
pub use writer::CsvWriter;

/// Field separator
pub const DELIMITER: char = ',';

/// Row terminator
pub const LINE_TERMINATOR: &str = "\n";
