//! In-memory workbook: an ordered list of named sheets

use excel_sheet_core::SheetStore;

use crate::error::{XlsxError, XlsxResult};
use crate::MAX_SHEET_NAME_LEN;

const FORBIDDEN_NAME_CHARS: [char; 7] = [':', '\\', '/', '?', '*', '[', ']'];

/// One named worksheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XlsxSheet {
    /// Sheet tab name
    pub name: String,
    /// Cell text, bounds carry the sheet's declared dimension
    pub store: SheetStore,
}

impl XlsxSheet {
    /// Create an empty sheet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store: SheetStore::new(),
        }
    }
}

/// A workbook reduced to cell text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XlsxBook {
    sheets: Vec<XlsxSheet>,
}

impl XlsxBook {
    /// Create a workbook with no sheets
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sheets
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the workbook has no sheets
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Iterate over sheets in tab order
    pub fn sheets(&self) -> impl Iterator<Item = &XlsxSheet> {
        self.sheets.iter()
    }

    /// Sheet names in tab order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Find a sheet by name (case-insensitive, as Excel compares tab names)
    pub fn sheet(&self, name: &str) -> Option<&XlsxSheet> {
        self.position(name).map(|i| &self.sheets[i])
    }

    /// Append a new empty sheet
    pub fn add_sheet(&mut self, name: &str) -> XlsxResult<&mut XlsxSheet> {
        validate_sheet_name(name)?;
        if self.position(name).is_some() {
            return Err(XlsxError::InvalidSheetName(format!(
                "{} (already exists)",
                name
            )));
        }
        self.sheets.push(XlsxSheet::new(name));
        let last = self.sheets.len() - 1;
        Ok(&mut self.sheets[last])
    }

    fn position(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.sheets
            .iter()
            .position(|s| s.name.to_lowercase() == wanted)
    }
}

/// Check a sheet name against Excel's tab-name rules
pub fn validate_sheet_name(name: &str) -> XlsxResult<()> {
    let invalid = name.trim().is_empty()
        || name.chars().count() > MAX_SHEET_NAME_LEN
        || name.contains(&FORBIDDEN_NAME_CHARS[..])
        || name.starts_with('\'')
        || name.ends_with('\'');

    if invalid {
        Err(XlsxError::InvalidSheetName(name.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_find() {
        let mut book = XlsxBook::new();
        book.add_sheet("Data").unwrap().store.set(0, 0, "x");
        book.add_sheet("Other").unwrap();

        assert_eq!(book.sheet_names(), vec!["Data", "Other"]);
        assert_eq!(book.sheet("data").unwrap().store.get(0, 0), "x");
        assert!(book.sheet("Missing").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut book = XlsxBook::new();
        book.add_sheet("Data").unwrap();
        assert!(book.add_sheet("DATA").is_err());
    }

    #[test]
    fn test_sheet_name_rules() {
        assert!(validate_sheet_name("Sheet1").is_ok());
        assert!(validate_sheet_name("数据").is_ok());
        assert!(validate_sheet_name("").is_err());
        assert!(validate_sheet_name("a/b").is_err());
        assert!(validate_sheet_name("[x]").is_err());
        assert!(validate_sheet_name("'quoted'").is_err());
        assert!(validate_sheet_name(&"x".repeat(32)).is_err());
    }
}
