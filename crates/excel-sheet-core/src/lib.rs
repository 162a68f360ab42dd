//! # excel-sheet-core
//!
//! Core data structures for the excel-sheet library.
//!
//! This crate provides the fundamental types used throughout excel-sheet:
//! - [`CellAddress`] - A (row, column) key, 0-based, with A1 conversion
//! - [`SheetStore`] - The sparse string table with tracked bounds
//! - [`Report`] and [`Reporter`] - Non-fatal diagnostics and notices
//!
//! ## Example
//!
//! ```rust
//! use excel_sheet_core::SheetStore;
//!
//! let mut store = SheetStore::new();
//! store.set(0, 0, "1");
//! store.set(1, 2, "2");
//!
//! assert_eq!(store.row_count(), 2);
//! assert_eq!(store.col_count(), 3);
//! assert_eq!(store.get(1, 2), "2");
//! assert_eq!(store.get(1, 1), "");
//! ```

pub mod cell;
pub mod error;
pub mod report;

pub use cell::{CellAddress, SheetStore};
pub use error::{Error, Result};
pub use report::{LogReporter, RecordingReporter, Report, Reporter, Severity};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;
