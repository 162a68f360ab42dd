//! Single-sheet encode/decode against a workbook file

use std::io::Cursor;
use std::path::Path;

use excel_sheet_core::SheetStore;

use crate::book::XlsxBook;
use crate::error::XlsxResult;
use crate::reader::XlsxReader;
use crate::writer::XlsxWriter;

const FALLBACK_SHEET_NAME: &str = "Sheet1";

/// Sheet name used when the caller gives none: the file name up to its
/// first `.` (`data/levels.v2.xlsx` gives `levels`)
pub fn default_sheet_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let base = file_name.split('.').next().unwrap_or_default();

    if base.is_empty() {
        FALLBACK_SHEET_NAME.to_string()
    } else {
        base.to_string()
    }
}

/// Write `store` as the sheet `sheet_name` of the workbook at `path`
///
/// The file is created if absent. In an existing workbook only the target
/// sheet is rewritten, replacing its previous content entirely, or appended
/// when missing; every other part of the package is kept as it was.
pub fn encode(store: &SheetStore, path: &Path, sheet_name: Option<&str>) -> XlsxResult<()> {
    let name = sheet_name
        .map(str::to_string)
        .unwrap_or_else(|| default_sheet_name(path));

    if !path.exists() {
        let mut book = XlsxBook::new();
        book.add_sheet(&name)?.store = store.clone();
        log::debug!(
            "writing sheet \"{}\" ({}x{}) to new workbook {}",
            name,
            store.row_count(),
            store.col_count(),
            path.display()
        );
        return XlsxWriter::write_file(&book, path);
    }

    let existing = std::fs::read(path)?;
    let mut buf = Cursor::new(Vec::new());
    XlsxWriter::replace_sheet(Cursor::new(existing), &name, store, &mut buf)?;
    std::fs::write(path, buf.into_inner())?;
    Ok(())
}

/// Read the sheet `sheet_name` of the workbook at `path`
///
/// Returns `Ok(None)` when the workbook has no such sheet.
pub fn decode(path: &Path, sheet_name: Option<&str>) -> XlsxResult<Option<SheetStore>> {
    let name = sheet_name
        .map(str::to_string)
        .unwrap_or_else(|| default_sheet_name(path));
    XlsxReader::read_sheet_file(path, &name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sheet_name() {
        assert_eq!(default_sheet_name(Path::new("assets/Excel/test.xlsx")), "test");
        assert_eq!(default_sheet_name(Path::new("a/levels.v2.xlsx")), "levels");
        assert_eq!(default_sheet_name(Path::new("plain")), "plain");
        assert_eq!(default_sheet_name(Path::new(".xlsx")), "Sheet1");
    }
}
