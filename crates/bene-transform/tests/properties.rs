//! Property tests for join cardinality and matrix invariants.

use bene_transform::{SourceFrame, crosstab, left_join};
use polars::prelude::*;
use proptest::prelude::*;

fn nullable_frame(name: &str, columns: Vec<(&str, Vec<Option<String>>)>) -> SourceFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(col, values)| Series::new(col.into(), values).into())
        .collect();
    SourceFrame::new(name, DataFrame::new(cols).unwrap())
}

fn label() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        4 => prop::sample::select(vec!["A", "B", "C", "D"]).prop_map(|s| Some(s.to_string())),
    ]
}

proptest! {
    #[test]
    fn join_preserves_left_row_count(
        keys in prop::collection::vec(prop::option::of(0u32..12), 0..40),
        district_count in 1u32..8,
    ) {
        let left_keys: Vec<Option<String>> = keys.iter().map(|k| k.map(|k| k.to_string())).collect();
        let left = nullable_frame("beneficiaries", vec![("district_id", left_keys)]);
        let ids: Vec<Option<String>> = (0..district_count).map(|id| Some(id.to_string())).collect();
        let names: Vec<Option<String>> = (0..district_count).map(|id| Some(format!("D{id}"))).collect();
        let right = nullable_frame("districts", vec![("dist_id", ids), ("dist_name", names)]);

        let joined = left_join(&left, &right, "district_id", "dist_id").unwrap();
        prop_assert_eq!(joined.record_count(), keys.len());
    }

    #[test]
    fn matrix_counts_every_complete_row(
        rows in prop::collection::vec((label(), label()), 0..60),
    ) {
        let (row_values, col_values): (Vec<_>, Vec<_>) = rows.iter().cloned().unzip();
        let frame = nullable_frame("joined", vec![("a", row_values), ("b", col_values)]);
        let matrix = crosstab(&frame, "a", "b").unwrap();

        let complete = rows.iter().filter(|(a, b)| a.is_some() && b.is_some()).count() as u64;
        prop_assert_eq!(matrix.grand_total(), complete);

        let totals = matrix.row_totals();
        prop_assert!(totals.windows(2).all(|w| w[0] >= w[1]));
        for row in &matrix.counts {
            prop_assert_eq!(row.len(), matrix.column_count());
        }

        let again = crosstab(&frame, "a", "b").unwrap();
        prop_assert_eq!(matrix, again);
    }
}
