//! End-to-end tests for CSV roundtrip (fill -> write file -> read file -> verify)

use excel_sheet_core::SheetStore;
use excel_sheet_csv::{CsvReader, CsvWriter};
use pretty_assertions::assert_eq;

fn populated(store: &SheetStore) -> Vec<(u32, u32, String)> {
    store
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(addr, v)| (addr.row, addr.col, v.to_string()))
        .collect()
}

#[test]
fn test_roundtrip_preserves_entries_and_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.csv");

    let mut store = SheetStore::new();
    store.set(0, 0, "id");
    store.set(0, 3, "name");
    store.set(2, 1, "Hello World");
    store.set(4, 3, "末尾");

    CsvWriter::write_file(&store, &path).unwrap();
    let read = CsvReader::read_file(&path).unwrap();

    assert_eq!(populated(&read), populated(&store));
    assert_eq!(read.row_count(), 5);
    assert_eq!(read.col_count(), 4);
}

#[test]
fn test_write_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.csv");
    std::fs::write(&path, "old,old,old\nold\nold\nold\n").unwrap();

    let mut store = SheetStore::new();
    store.set(0, 0, "new");
    CsvWriter::write_file(&store, &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
}

#[test]
fn test_trailing_empty_cells_survive_as_extent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sparse.csv");

    let mut store = SheetStore::new();
    store.set(0, 0, "a");
    store.set(3, 5, "");

    CsvWriter::write_file(&store, &path).unwrap();
    let read = CsvReader::read_file(&path).unwrap();

    assert_eq!(read.cell_count(), 1);
    assert_eq!((read.row_count(), read.col_count()), (4, 6));
}

#[test]
fn test_comma_in_value_is_split_on_read() {
    let mut store = SheetStore::new();
    store.set(0, 0, "a,b");

    let mut buf = Vec::new();
    CsvWriter::write(&store, &mut buf).unwrap();
    let read = CsvReader::read(buf.as_slice()).unwrap();

    assert_eq!(read.get(0, 0), "a");
    assert_eq!(read.get(0, 1), "b");
    assert_eq!(read.col_count(), 2);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CsvReader::read_file(dir.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, excel_sheet_csv::CsvError::Io(_)));
}
