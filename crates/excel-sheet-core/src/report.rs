//! Diagnostics and notices
//!
//! Out-of-range reads, missing files and missing sheets are not errors: the
//! operation still completes and the condition is handed to a [`Reporter`].
//! Successful saves and loads are reported the same way at [`Severity::Info`].

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// How serious a [`Report`] is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Progress notice
    Info,
    /// Recoverable problem
    Error,
}

/// A diagnostic or notice emitted by the sheet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Report {
    /// Read of a row outside `[0, row_count)`
    #[error("Row {row} out of range (row count: {row_count})")]
    RowOutOfRange { row: u32, row_count: u32 },

    /// Read of a column outside `[0, col_count)`
    #[error("Column {col} out of range (column count: {col_count})")]
    ColumnOutOfRange { col: u32, col_count: u32 },

    /// Load target does not exist
    #[error("Can't find path \"{}\"", .0.display())]
    FileNotFound(PathBuf),

    /// Workbook has no sheet with the requested name
    #[error("Can't find sheet \"{sheet}\" in file \"{}\"", .path.display())]
    SheetNotFound { sheet: String, path: PathBuf },

    /// Save finished
    #[error("Saved sheet \"{}::{}\"", .path.display(), .sheet.as_deref().unwrap_or(""))]
    Saved {
        path: PathBuf,
        sheet: Option<String>,
    },

    /// Load finished
    #[error("Loaded sheet \"{}::{}\"", .path.display(), .sheet.as_deref().unwrap_or(""))]
    Loaded {
        path: PathBuf,
        sheet: Option<String>,
    },
}

impl Report {
    /// Severity of this report
    pub fn severity(&self) -> Severity {
        match self {
            Report::Saved { .. } | Report::Loaded { .. } => Severity::Info,
            Report::RowOutOfRange { .. }
            | Report::ColumnOutOfRange { .. }
            | Report::FileNotFound(_)
            | Report::SheetNotFound { .. } => Severity::Error,
        }
    }

    /// Check if this report describes a problem
    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

/// Sink for [`Report`]s
pub trait Reporter {
    /// Deliver one report
    fn report(&self, report: &Report);
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, report: &Report) {
        (**self).report(report)
    }
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn report(&self, report: &Report) {
        (**self).report(report)
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&self, report: &Report) {
        (**self).report(report)
    }
}

/// Forwards reports to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, report: &Report) {
        match report.severity() {
            Severity::Info => log::info!(target: "excel_sheet", "{report}"),
            Severity::Error => log::error!(target: "excel_sheet", "{report}"),
        }
    }
}

/// Keeps every report in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<Report>>,
}

impl RecordingReporter {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the reports received so far
    pub fn reports(&self) -> Vec<Report> {
        self.lock().clone()
    }

    /// Reports at [`Severity::Error`]
    pub fn errors(&self) -> Vec<Report> {
        self.lock().iter().filter(|r| r.is_error()).cloned().collect()
    }

    /// Remove and return everything received so far
    pub fn take(&self) -> Vec<Report> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Report>> {
        // A poisoned recorder still holds valid reports.
        self.reports.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, report: &Report) {
        self.lock().push(report.clone());
    }
}
