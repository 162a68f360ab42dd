//! CSV reader

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::DELIMITER;
use excel_sheet_core::SheetStore;

const BOM: char = '\u{feff}';

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a fresh store
    pub fn read_file<P: AsRef<Path>>(path: P) -> CsvResult<SheetStore> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let store = Self::read(file)?;
        log::debug!(
            "read {} cells ({}x{}) from {}",
            store.cell_count(),
            store.row_count(),
            store.col_count(),
            path.display()
        );
        Ok(store)
    }

    /// Read CSV text into a fresh store
    ///
    /// Line `i`, field `j` lands at `(i, j)` when the field is non-empty.
    /// The row bound ends as the number of lines and the column bound as the
    /// widest line's field count, so blank lines and empty trailing fields
    /// still count toward the extent.
    pub fn read<R: Read>(reader: R) -> CsvResult<SheetStore> {
        let mut store = SheetStore::new();

        for (row, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let line = if row == 0 {
                line.strip_prefix(BOM).unwrap_or(&line)
            } else {
                &line
            };
            let row = u32::try_from(row)
                .map_err(|_| CsvError::TooLarge(format!("line {} is past the last row", row)))?;

            let mut field_count = 0u32;
            for (col, field) in line.split(DELIMITER).enumerate() {
                let col = u32::try_from(col).map_err(|_| {
                    CsvError::TooLarge(format!("line {} has too many fields", row + 1))
                })?;
                if !field.is_empty() {
                    store.set(row, col, field);
                }
                field_count = col + 1;
            }

            store.extend_bounds(row + 1, field_count);
        }

        Ok(store)
    }
}
