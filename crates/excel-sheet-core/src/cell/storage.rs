//! Sparse cell storage
//!
//! Only written cells are stored. The logical extent of the table is
//! tracked separately as `row_count` / `col_count`, the exclusive upper
//! bounds of every address ever written, so serializers can walk a dense
//! rectangle without the store ever materializing one.

use ahash::AHashMap;

use super::CellAddress;
use crate::report::{Report, Reporter};

/// Sparse string table
///
/// Invariant: every stored address `(r, c)` satisfies `r < row_count` and
/// `c < col_count`. The bounds only grow, through [`set`](Self::set) or
/// [`extend_bounds`](Self::extend_bounds), until [`clear`](Self::clear).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetStore {
    /// Address → cell text
    cells: AHashMap<CellAddress, String>,
    /// Exclusive upper bound of written rows
    row_count: u32,
    /// Exclusive upper bound of written columns
    col_count: u32,
}

impl SheetStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive upper bound of written rows (not a count of populated cells)
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Exclusive upper bound of written columns (not a count of populated cells)
    pub fn col_count(&self) -> u32 {
        self.col_count
    }

    /// Get the text at `(row, col)`; absent cells read as the empty string
    pub fn get(&self, row: u32, col: u32) -> &str {
        self.cells
            .get(&CellAddress::new(row, col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Like [`get`](Self::get), but first reports any coordinate outside the
    /// tracked bounds. The read still happens.
    pub fn get_reported(&self, row: u32, col: u32, reporter: &dyn Reporter) -> &str {
        for report in self.range_violations(row, col) {
            reporter.report(&report);
        }
        self.get(row, col)
    }

    /// Range diagnostics for reading `(row, col)`, row first
    pub fn range_violations(&self, row: u32, col: u32) -> Vec<Report> {
        let mut violations = Vec::new();
        if row >= self.row_count {
            violations.push(Report::RowOutOfRange {
                row,
                row_count: self.row_count,
            });
        }
        if col >= self.col_count {
            violations.push(Report::ColumnOutOfRange {
                col,
                col_count: self.col_count,
            });
        }
        violations
    }

    /// Insert or overwrite the text at `(row, col)` and grow the bounds
    ///
    /// Empty strings are stored too; they read back the same as an absent
    /// cell but still extend the bounds. An index of `u32::MAX` has no
    /// representable exclusive bound, so such a write is logged and dropped.
    pub fn set(&mut self, row: u32, col: u32, value: impl Into<String>) {
        let (Some(row_count), Some(col_count)) = (row.checked_add(1), col.checked_add(1)) else {
            log::warn!(
                "cell ({}, {}) is past the last addressable cell, not stored",
                row,
                col
            );
            return;
        };
        self.cells.insert(CellAddress::new(row, col), value.into());
        self.extend_bounds(row_count, col_count);
    }

    /// Grow the bounds to at least `row_count` x `col_count`
    ///
    /// Decoders use this to adopt the extent a file declares for itself.
    pub fn extend_bounds(&mut self, row_count: u32, col_count: u32) {
        self.row_count = self.row_count.max(row_count);
        self.col_count = self.col_count.max(col_count);
    }

    /// Remove every cell and reset both bounds to 0
    pub fn clear(&mut self) {
        self.cells.clear();
        self.row_count = 0;
        self.col_count = 0;
    }

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if no cell is stored
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over stored cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (CellAddress, &str)> {
        let mut entries: Vec<_> = self
            .cells
            .iter()
            .map(|(addr, value)| (*addr, value.as_str()))
            .collect();
        entries.sort_unstable_by_key(|(addr, _)| *addr);
        entries.into_iter()
    }

    /// Iterate over the dense row `row`, yielding `""` for absent cells
    pub fn row_values(&self, row: u32) -> impl Iterator<Item = &str> {
        (0..self.col_count).map(move |col| self.get(row, col))
    }
}
