//! # excel-sheet-xlsx
//!
//! XLSX (Office Open XML) reader and writer for excel-sheet.
//!
//! Only cell text is carried. A workbook is read into an [`XlsxBook`], a
//! list of named [`SheetStore`](excel_sheet_core::SheetStore)s, and written
//! back from one. [`encode`] and [`decode`] are the single-sheet entry
//! points used by the sheet facade.

pub mod book;
pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

mod escape;

pub use book::{XlsxBook, XlsxSheet};
pub use codec::{decode, default_sheet_name, encode};
pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
