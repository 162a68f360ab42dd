//! CSV writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::CsvResult;
use crate::{DELIMITER, LINE_TERMINATOR};
use excel_sheet_core::SheetStore;

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a store to a CSV file, replacing any existing file
    pub fn write_file<P: AsRef<Path>>(store: &SheetStore, path: P) -> CsvResult<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        Self::write(store, BufWriter::new(file))?;
        log::debug!(
            "wrote {}x{} rows to {}",
            store.row_count(),
            store.col_count(),
            path.display()
        );
        Ok(())
    }

    /// Write a store as CSV text
    ///
    /// Every row in `0..row_count` produces one line holding `col_count`
    /// fields; absent cells are written as empty fields. Values are written
    /// verbatim.
    pub fn write<W: Write>(store: &SheetStore, mut writer: W) -> CsvResult<()> {
        let mut line = String::new();

        for row in 0..store.row_count() {
            line.clear();
            for (col, value) in store.row_values(row).enumerate() {
                if col > 0 {
                    line.push(DELIMITER);
                }
                line.push_str(value);
            }
            line.push_str(LINE_TERMINATOR);
            writer.write_all(line.as_bytes())?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_str(store: &SheetStore) -> String {
        let mut buf = Vec::new();
        CsvWriter::write(store, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_dense_rectangle() {
        let mut store = SheetStore::new();
        store.set(0, 0, "1");
        store.set(1, 2, "2");

        assert_eq!(write_str(&store), "1,,\n,,2\n");
    }

    #[test]
    fn test_write_empty_store() {
        assert_eq!(write_str(&SheetStore::new()), "");
    }

    #[test]
    fn test_single_column_blank_rows() {
        let mut store = SheetStore::new();
        store.set(2, 0, "z");
        assert_eq!(write_str(&store), "\n\nz\n");
    }

    #[test]
    fn test_values_are_not_quoted() {
        let mut store = SheetStore::new();
        store.set(0, 0, "a,b");
        store.set(0, 1, "say \"hi\"");
        assert_eq!(write_str(&store), "a,b,say \"hi\"\n");
    }

    #[test]
    fn test_utf8_text() {
        let mut store = SheetStore::new();
        store.set(0, 0, "名字");
        store.set(0, 1, "\u{1F600}");
        assert_eq!(write_str(&store).as_bytes(), "名字,\u{1F600}\n".as_bytes());
    }
}
