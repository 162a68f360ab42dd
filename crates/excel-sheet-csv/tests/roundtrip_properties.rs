//! Property tests for CSV write -> read

use excel_sheet_core::SheetStore;
use excel_sheet_csv::{CsvReader, CsvWriter};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        rng_seed: proptest::test_runner::RngSeed::Fixed(0),
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    // Values without the delimiter or line breaks survive a round trip
    #[test]
    fn comma_free_values_roundtrip(
        writes in proptest::collection::vec(
            (0u32..40, 0u32..12, "[a-zA-Z0-9 .;:_-]{1,8}"),
            1..48,
        )
    ) {
        let mut store = SheetStore::new();
        for (row, col, value) in &writes {
            store.set(*row, *col, value.as_str());
        }

        let mut buf = Vec::new();
        CsvWriter::write(&store, &mut buf).unwrap();
        let read = CsvReader::read(buf.as_slice()).unwrap();

        let line_count = buf.iter().filter(|&&b| b == b'\n').count() as u32;
        prop_assert_eq!(read.row_count(), line_count);
        prop_assert_eq!(read.col_count(), store.col_count());
        prop_assert_eq!(read, store);
    }
}
