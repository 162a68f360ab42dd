//! Error types for the sheet facade

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Hard failures of save/load
///
/// Missing files, missing sheets and out-of-range reads are not errors;
/// they go to the sheet's [`Reporter`](excel_sheet_core::Reporter).
#[derive(Debug, Error)]
pub enum Error {
    /// Format name outside the supported set
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Could not create the directory a file is saved into
    #[error("failed to create directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XLSX codec error
    #[error("XLSX error: {0}")]
    Xlsx(#[from] excel_sheet_xlsx::XlsxError),

    /// CSV codec error
    #[error("CSV error: {0}")]
    Csv(#[from] excel_sheet_csv::CsvError),
}
