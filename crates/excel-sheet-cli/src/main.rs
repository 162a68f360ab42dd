//! Sheet CLI - inspect, edit and convert sheets

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use excel_sheet::{FileFormat, Report, Reporter, Sheet, SheetConfig, DEFAULT_ROOT};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheet")]
#[command(author, version, about = "Inspect, edit and convert XLSX/CSV sheets")]
struct Cli {
    #[command(flatten)]
    location: Location,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Location {
    /// Directory sheet paths are resolved against
    #[arg(long, global = true, default_value = DEFAULT_ROOT)]
    root: PathBuf,

    /// File format (xlsx, csv)
    #[arg(short, long, global = true, default_value_t = FileFormat::Xlsx)]
    format: FileFormat,

    /// Sheet name inside an XLSX workbook (default: file base name)
    #[arg(short, long, global = true)]
    sheet: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every populated cell and the sheet bounds
    Show {
        /// Sheet path under the root, without extension
        path: PathBuf,
    },

    /// Print the text of one cell
    Get {
        /// Sheet path under the root, without extension
        path: PathBuf,
        /// Row (0-based)
        row: u32,
        /// Column (0-based)
        col: u32,
    },

    /// Write one cell and save the sheet back
    Set {
        /// Sheet path under the root, without extension
        path: PathBuf,
        /// Row (0-based)
        row: u32,
        /// Column (0-based)
        col: u32,
        /// New cell text
        value: String,
    },

    /// Load a sheet in one format and save it in another
    Convert {
        /// Sheet path under the root, without extension
        path: PathBuf,

        /// Target format
        #[arg(long)]
        to: FileFormat,

        /// Target path under the root (default: same as input)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Prints reports to stderr
struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, report: &Report) {
        if report.is_error() {
            eprintln!("Error: {}", report);
        } else {
            eprintln!("{}", report);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let location = &cli.location;

    match &cli.command {
        Commands::Show { path } => show(location, path),
        Commands::Get { path, row, col } => get(location, path, *row, *col),
        Commands::Set {
            path,
            row,
            col,
            value,
        } => set(location, path, *row, *col, value),
        Commands::Convert { path, to, out } => convert(location, path, *to, out.as_deref()),
    }
}

fn open(location: &Location, path: &Path) -> Result<Sheet> {
    let config = SheetConfig::new(&location.root);
    let full_path = config.resolve(path, location.format);
    Sheet::open_with(
        config,
        ConsoleReporter,
        path,
        location.sheet.as_deref(),
        location.format,
    )
    .with_context(|| format!("Failed to load '{}'", full_path.display()))
}

fn show(location: &Location, path: &Path) -> Result<()> {
    let sheet = open(location, path)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (addr, value) in sheet.store().iter() {
        if !value.is_empty() {
            writeln!(out, "[{}, {}]: {}", addr.row, addr.col, value)?;
        }
    }
    writeln!(out, "{} rows x {} columns", sheet.row_count(), sheet.col_count())?;
    Ok(())
}

fn get(location: &Location, path: &Path, row: u32, col: u32) -> Result<()> {
    let sheet = open(location, path)?;
    println!("{}", sheet.get(row, col));
    Ok(())
}

fn set(location: &Location, path: &Path, row: u32, col: u32, value: &str) -> Result<()> {
    let mut sheet = open(location, path)?;
    sheet.set(row, col, value);
    sheet
        .save(path, location.sheet.as_deref(), location.format)
        .context("Failed to save sheet")?;
    Ok(())
}

fn convert(
    location: &Location,
    path: &Path,
    to: FileFormat,
    out: Option<&Path>,
) -> Result<()> {
    let sheet = open(location, path)?;
    let target = out.unwrap_or(path);
    let written = sheet
        .save(target, location.sheet.as_deref(), to)
        .with_context(|| format!("Failed to convert to {}", to))?;
    eprintln!(
        "Wrote {} rows to '{}'",
        sheet.row_count(),
        written.display()
    );
    Ok(())
}
