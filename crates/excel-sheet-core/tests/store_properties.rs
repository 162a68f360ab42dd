//! Property tests for the sparse store's bounds and lookups

use excel_sheet_core::SheetStore;
use proptest::prelude::*;

fn writes() -> impl Strategy<Value = Vec<(u32, u32, String)>> {
    proptest::collection::vec((0u32..2_000, 0u32..300, "[a-z0-9 ]{1,6}"), 1..64)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        rng_seed: proptest::test_runner::RngSeed::Fixed(0),
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn get_returns_the_last_value_set(writes in writes()) {
        let mut store = SheetStore::new();
        for (row, col, value) in &writes {
            store.set(*row, *col, value.as_str());
            prop_assert_eq!(store.get(*row, *col), value.as_str());
        }
    }

    #[test]
    fn bounds_never_shrink_and_track_max_index(writes in writes()) {
        let mut store = SheetStore::new();
        for (row, col, value) in &writes {
            let before = (store.row_count(), store.col_count());
            store.set(*row, *col, value.as_str());
            prop_assert!(store.row_count() >= before.0);
            prop_assert!(store.col_count() >= before.1);
        }

        let max_row = writes.iter().map(|(row, _, _)| *row).max().unwrap();
        let max_col = writes.iter().map(|(_, col, _)| *col).max().unwrap();
        prop_assert_eq!(store.row_count(), max_row + 1);
        prop_assert_eq!(store.col_count(), max_col + 1);

        for (addr, _) in store.iter() {
            prop_assert!(addr.row < store.row_count() && addr.col < store.col_count());
        }
    }

    #[test]
    fn clear_empties_everything(writes in writes()) {
        let mut store = SheetStore::new();
        for (row, col, value) in &writes {
            store.set(*row, *col, value.as_str());
        }
        store.clear();

        prop_assert_eq!((store.row_count(), store.col_count()), (0, 0));
        for (row, col, _) in &writes {
            prop_assert_eq!(store.get(*row, *col), "");
        }
    }
}
