//! CSV error types

use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur during CSV operations
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error (including text that is not valid UTF-8)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// More lines or fields than a sheet can address
    #[error("CSV too large: {0}")]
    TooLarge(String),
}
