//! Cell address type

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address, the lookup key of a [`SheetStore`](crate::SheetStore)
///
/// Both fields are 0-based. Workbook files address cells 1-based in A1
/// notation; [`CellAddress::parse`] and [`CellAddress::to_a1_string`]
/// translate between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: u32,
}

impl CellAddress {
    /// Create a new cell address
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// `$` markers are accepted and ignored.
    ///
    /// # Examples
    /// ```
    /// use excel_sheet_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!((addr.row, addr.col), (0, 0));
    ///
    /// let addr = CellAddress::parse("$C$7").unwrap();
    /// assert_eq!((addr.row, addr.col), (6, 2));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }

        if pos == col_start {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(&s[col_start..pos])?;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        // Excel rows are 1-based, we use 0-based internally
        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        let row = row - 1;

        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }

        Ok(Self { row, col })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col as u64 + 1;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            col = col * 26 + (c.to_ascii_uppercase() as u64 - 'A' as u64 + 1);
            if col > MAX_COLS as u64 {
                return Err(Error::ColumnOutOfBounds(col as u32 - 1, MAX_COLS - 1));
            }
        }

        Ok(col as u32 - 1)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row as u64 + 1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<(u32, u32)> for CellAddress {
    fn from((row, col): (u32, u32)) -> Self {
        Self::new(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(CellAddress::column_to_letters(0), "A");
        assert_eq!(CellAddress::column_to_letters(25), "Z");
        assert_eq!(CellAddress::column_to_letters(26), "AA");
        assert_eq!(CellAddress::column_to_letters(701), "ZZ");
        assert_eq!(CellAddress::column_to_letters(702), "AAA");
        assert_eq!(CellAddress::column_to_letters(16383), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(CellAddress::letters_to_column("A").unwrap(), 0);
        assert_eq!(CellAddress::letters_to_column("AB").unwrap(), 27);
        assert_eq!(CellAddress::letters_to_column("XFD").unwrap(), 16383);
        assert_eq!(CellAddress::letters_to_column("aa").unwrap(), 26);
        assert!(CellAddress::letters_to_column("XFE").is_err());
        assert!(CellAddress::letters_to_column("ZZZZZZZZ").is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!(CellAddress::parse("A1").unwrap(), CellAddress::new(0, 0));
        assert_eq!(CellAddress::parse("C2").unwrap(), CellAddress::new(1, 2));
        assert_eq!(CellAddress::parse("$B$3").unwrap(), CellAddress::new(2, 1));
        assert_eq!(
            CellAddress::parse("XFD1048576").unwrap(),
            CellAddress::new(1_048_575, 16_383)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(CellAddress::parse("").is_err());
        assert!(CellAddress::parse("A").is_err());
        assert!(CellAddress::parse("1").is_err());
        assert!(CellAddress::parse("A0").is_err());
        assert!(CellAddress::parse("A1048577").is_err());
    }

    #[test]
    fn test_display_is_one_based() {
        assert_eq!(CellAddress::new(0, 0).to_string(), "A1");
        assert_eq!(CellAddress::new(99, 2).to_string(), "C100");
    }

    #[test]
    fn test_structural_equality_as_key() {
        let mut keys = HashSet::new();
        keys.insert(CellAddress::new(1, 2));
        assert!(keys.contains(&CellAddress::from((1, 2))));
        assert!(!keys.contains(&CellAddress::new(2, 1)));
    }
}
