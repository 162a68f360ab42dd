//! The sheet facade

use std::fmt;
use std::ops::Index;
use std::path::{Path, PathBuf};

use excel_sheet_core::{LogReporter, Report, Reporter, SheetStore};
use excel_sheet_csv::{CsvReader, CsvWriter};

use crate::config::SheetConfig;
use crate::error::{Error, Result};
use crate::format::FileFormat;

/// What [`Sheet::load`] found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file was read into the sheet
    Loaded,
    /// No file at the resolved path; the sheet is left empty
    FileNotFound,
    /// The workbook has no sheet of the requested name; the sheet is left empty
    SheetNotFound,
}

/// A sparse table of cell text that saves to and loads from disk
///
/// Reads outside the current bounds, and loads of missing files or sheets,
/// are handed to the sheet's [`Reporter`] and never fail.
///
/// ```no_run
/// use excel_sheet::{FileFormat, Sheet};
///
/// let mut sheet = Sheet::new();
/// sheet.set(0, 0, "1");
/// sheet.set(1, 2, "2");
/// assert_eq!(sheet.row_count(), 2);
/// assert_eq!(sheet.col_count(), 3);
///
/// sheet.save("test", Some("Sheet1"), FileFormat::Csv).unwrap();
/// ```
pub struct Sheet {
    store: SheetStore,
    config: SheetConfig,
    reporter: Box<dyn Reporter>,
}

impl Sheet {
    /// Create an empty sheet with the default config, reporting through `log`
    pub fn new() -> Self {
        Self::with_config(SheetConfig::default(), LogReporter)
    }

    /// Create an empty sheet
    pub fn with_config(config: SheetConfig, reporter: impl Reporter + 'static) -> Self {
        Self {
            store: SheetStore::new(),
            config,
            reporter: Box::new(reporter),
        }
    }

    /// Create a sheet and immediately [`load`](Self::load) `path` into it
    pub fn open(
        path: impl AsRef<Path>,
        sheet_name: Option<&str>,
        format: FileFormat,
    ) -> Result<Self> {
        Self::open_with(SheetConfig::default(), LogReporter, path, sheet_name, format)
    }

    /// [`open`](Self::open) with an explicit config and reporter
    pub fn open_with(
        config: SheetConfig,
        reporter: impl Reporter + 'static,
        path: impl AsRef<Path>,
        sheet_name: Option<&str>,
        format: FileFormat,
    ) -> Result<Self> {
        let mut sheet = Self::with_config(config, reporter);
        sheet.load(path, sheet_name, format)?;
        Ok(sheet)
    }

    /// Exclusive upper bound of written rows
    pub fn row_count(&self) -> u32 {
        self.store.row_count()
    }

    /// Exclusive upper bound of written columns
    pub fn col_count(&self) -> u32 {
        self.store.col_count()
    }

    /// Text at `(row, col)`, `""` when absent
    ///
    /// A coordinate outside the bounds is reported; the read still happens.
    pub fn get(&self, row: u32, col: u32) -> &str {
        self.store.get_reported(row, col, &*self.reporter)
    }

    /// Write the text at `(row, col)`, growing the bounds as needed
    pub fn set(&mut self, row: u32, col: u32, value: impl Into<String>) {
        self.store.set(row, col, value);
    }

    /// Remove every cell and reset the bounds to 0
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// The underlying store
    pub fn store(&self) -> &SheetStore {
        &self.store
    }

    /// Save the sheet to `<root>/<path>.<extension>`
    ///
    /// Missing directories are created. For XLSX the sheet is written as
    /// `sheet_name`, defaulting to the file's base name; CSV ignores it.
    /// Returns the path written.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        sheet_name: Option<&str>,
        format: FileFormat,
    ) -> Result<PathBuf> {
        let full_path = self.config.resolve(path, format);

        if let Some(dir) = full_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let sheet = match format {
            FileFormat::Xlsx => {
                let name = resolve_sheet_name(&full_path, sheet_name);
                excel_sheet_xlsx::encode(&self.store, &full_path, Some(name.as_str()))?;
                Some(name)
            }
            FileFormat::Csv => {
                CsvWriter::write_file(&self.store, &full_path)?;
                None
            }
        };

        self.reporter.report(&Report::Saved {
            path: full_path.clone(),
            sheet,
        });
        Ok(full_path)
    }

    /// Replace the sheet's content with `<root>/<path>.<extension>`
    ///
    /// The sheet is cleared first. A missing file or (for XLSX) a missing
    /// sheet is reported and leaves the sheet empty.
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        sheet_name: Option<&str>,
        format: FileFormat,
    ) -> Result<LoadOutcome> {
        self.clear();
        let full_path = self.config.resolve(path, format);

        if !full_path.is_file() {
            self.reporter.report(&Report::FileNotFound(full_path));
            return Ok(LoadOutcome::FileNotFound);
        }

        let sheet = match format {
            FileFormat::Xlsx => {
                let name = resolve_sheet_name(&full_path, sheet_name);
                match excel_sheet_xlsx::decode(&full_path, Some(name.as_str()))? {
                    Some(store) => self.store = store,
                    None => {
                        self.reporter.report(&Report::SheetNotFound {
                            sheet: name,
                            path: full_path,
                        });
                        return Ok(LoadOutcome::SheetNotFound);
                    }
                }
                Some(name)
            }
            FileFormat::Csv => {
                self.store = CsvReader::read_file(&full_path)?;
                None
            }
        };

        self.reporter.report(&Report::Loaded {
            path: full_path,
            sheet,
        });
        Ok(LoadOutcome::Loaded)
    }
}

fn resolve_sheet_name(full_path: &Path, sheet_name: Option<&str>) -> String {
    sheet_name
        .map(str::to_string)
        .unwrap_or_else(|| excel_sheet_xlsx::default_sheet_name(full_path))
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<(u32, u32)> for Sheet {
    type Output = str;

    fn index(&self, (row, col): (u32, u32)) -> &str {
        self.get(row, col)
    }
}

impl fmt::Debug for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sheet")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use excel_sheet_core::RecordingReporter;
    use std::sync::Arc;

    fn sheet_in(root: &Path) -> (Sheet, Arc<RecordingReporter>) {
        let reporter = Arc::new(RecordingReporter::new());
        let sheet = Sheet::with_config(SheetConfig::new(root), reporter.clone());
        (sheet, reporter)
    }

    #[test]
    fn test_index_reads_like_get() {
        let (mut sheet, reporter) = sheet_in(Path::new("unused"));
        sheet.set(0, 1, "Hello World");

        assert_eq!(&sheet[(0, 1)], "Hello World");
        assert_eq!(&sheet[(0, 0)], "");
        assert!(reporter.reports().is_empty());

        assert_eq!(&sheet[(3, 0)], "");
        assert_eq!(
            reporter.take(),
            vec![Report::RowOutOfRange {
                row: 3,
                row_count: 1
            }]
        );
    }

    #[test]
    fn test_save_reports_resolved_sheet_name() {
        let dir = tempfile::tempdir().unwrap();
        let (mut sheet, reporter) = sheet_in(dir.path());
        sheet.set(0, 0, "x");

        let path = sheet.save("book", None, FileFormat::Xlsx).unwrap();

        assert_eq!(path, dir.path().join("book.xlsx"));
        assert_eq!(
            reporter.reports(),
            vec![Report::Saved {
                path,
                sheet: Some("book".into())
            }]
        );
    }

    #[test]
    fn test_load_clears_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let (mut sheet, _reporter) = sheet_in(dir.path());
        sheet.set(7, 7, "stale");

        sheet.load("absent", None, FileFormat::Csv).unwrap();

        assert_eq!(sheet.store().cell_count(), 0);
        assert_eq!((sheet.row_count(), sheet.col_count()), (0, 0));
    }
}
