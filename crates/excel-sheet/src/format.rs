//! Supported file formats

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// File format a sheet is saved as or loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileFormat {
    /// Office Open XML workbook (`.xlsx`)
    #[default]
    Xlsx,
    /// Comma-separated values (`.csv`)
    Csv,
}

impl FileFormat {
    /// Every supported format
    pub const ALL: [FileFormat; 2] = [FileFormat::Xlsx, FileFormat::Csv];

    /// Canonical file extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Xlsx => "xlsx",
            FileFormat::Csv => "csv",
        }
    }

    /// Look a format up by extension or name, ignoring case and a leading dot
    pub fn from_extension(extension: &str) -> Result<Self> {
        let wanted = extension.trim().trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnsupportedFormat(extension.to_string()))
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FileFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s)
    }
}
