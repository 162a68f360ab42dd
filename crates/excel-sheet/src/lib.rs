//! # excel-sheet
//!
//! A sparse, string-typed sheet with XLSX and CSV persistence.
//!
//! Cells are addressed by 0-based `(row, col)` and hold text only; absent
//! cells read as `""`. Files are resolved as `<root>/<path>.<extension>`
//! against a [`SheetConfig`].
//!
//! ## Example
//!
//! ```rust
//! use excel_sheet::{FileFormat, RecordingReporter, Sheet, SheetConfig};
//! use std::sync::Arc;
//!
//! let dir = std::env::temp_dir().join("excel-sheet-doc");
//! let reporter = Arc::new(RecordingReporter::new());
//! let mut sheet = Sheet::with_config(SheetConfig::new(&dir), reporter.clone());
//!
//! sheet.set(0, 0, "1");
//! sheet.set(1, 2, "2");
//! sheet.save("test", None, FileFormat::Csv).unwrap();
//!
//! sheet.load("test", None, FileFormat::Csv).unwrap();
//! assert_eq!(sheet.get(1, 2), "2");
//! assert_eq!((sheet.row_count(), sheet.col_count()), (2, 3));
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod sheet;

pub use config::{SheetConfig, DEFAULT_ROOT};
pub use error::{Error, Result};
pub use format::FileFormat;
pub use sheet::{LoadOutcome, Sheet};

// Re-export core types
pub use excel_sheet_core::{
    CellAddress, LogReporter, RecordingReporter, Report, Reporter, Severity, SheetStore,
};

// Re-export I/O types
pub use excel_sheet_csv::{CsvError, CsvReader, CsvWriter};
pub use excel_sheet_xlsx::{XlsxBook, XlsxError, XlsxReader, XlsxSheet, XlsxWriter};
