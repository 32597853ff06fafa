//! Tests for join, age derivation and cross-tabulation.

use bene_model::{DataIntegrityError, SchemaError};
use bene_transform::{
    AGE_COLUMN, AGE_GROUP_COLUMN, SourceFrame, TransformError, column_values, crosstab,
    derive_age, left_join, matrix_to_frame, value_counts,
};
use chrono::NaiveDate;
use polars::prelude::*;

/// Build a frame of nullable string columns; `""` is null.
fn test_frame(name: &str, columns: Vec<(&str, Vec<&str>)>) -> SourceFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(col, values)| {
            let values: Vec<Option<String>> = values
                .into_iter()
                .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
                .collect();
            Series::new(col.into(), values).into()
        })
        .collect();
    SourceFrame::new(name, DataFrame::new(cols).unwrap())
}

fn strings(frame: &SourceFrame, column: &str) -> Vec<Option<String>> {
    column_values(frame, column).unwrap()
}

fn some(values: &[&str]) -> Vec<Option<String>> {
    values
        .iter()
        .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
        .collect()
}

fn districts() -> SourceFrame {
    test_frame(
        "districts",
        vec![
            ("dist_id", vec!["1", "2", "3"]),
            ("dist_name", vec!["Pune", "Nagpur", "Nashik"]),
        ],
    )
}

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

// ============================================================================
// Join
// ============================================================================

#[test]
fn left_join_keeps_every_left_row_in_order() {
    let beneficiaries = test_frame(
        "beneficiaries",
        vec![
            ("district_id", vec!["2", "9", "1", "", "2"]),
            ("gender", vec!["M", "F", "F", "M", "F"]),
        ],
    );
    let joined = left_join(&beneficiaries, &districts(), "district_id", "dist_id").unwrap();

    assert_eq!(joined.name, "joined");
    assert_eq!(joined.record_count(), 5);
    assert_eq!(
        strings(&joined, "dist_name"),
        some(&["Nagpur", "", "Pune", "", "Nagpur"])
    );
    assert_eq!(strings(&joined, "gender"), some(&["M", "F", "F", "M", "F"]));
    // Differently named right key is kept.
    assert_eq!(strings(&joined, "dist_id"), some(&["2", "", "1", "", "2"]));
}

#[test]
fn left_join_matches_float_spelled_ids() {
    let beneficiaries = test_frame("beneficiaries", vec![("district_id", vec!["3.0", "01"])]);
    let joined = left_join(&beneficiaries, &districts(), "district_id", "dist_id").unwrap();
    assert_eq!(strings(&joined, "dist_name"), some(&["Nashik", "Pune"]));
}

#[test]
fn left_join_resolves_key_case_insensitively() {
    let beneficiaries = test_frame("beneficiaries", vec![("District_ID", vec!["1"])]);
    let joined = left_join(&beneficiaries, &districts(), "district_id", "DIST_ID").unwrap();
    assert_eq!(strings(&joined, "dist_name"), some(&["Pune"]));
}

#[test]
fn left_join_drops_shared_key_and_suffixes_collisions() {
    let left = test_frame(
        "beneficiaries",
        vec![("dist_id", vec!["1", "2"]), ("name", vec!["Asha", "Ravi"])],
    );
    let right = test_frame(
        "districts",
        vec![("dist_id", vec!["1", "2"]), ("name", vec!["Pune", "Nagpur"])],
    );
    let joined = left_join(&left, &right, "dist_id", "dist_id").unwrap();

    let names = joined.column_names();
    assert_eq!(names, vec!["dist_id", "name", "name_right"]);
    assert_eq!(strings(&joined, "name_right"), some(&["Pune", "Nagpur"]));
}

#[test]
fn left_join_never_overwrites_existing_columns() {
    let left = test_frame(
        "beneficiaries",
        vec![
            ("district_id", vec!["1"]),
            ("name", vec!["Asha"]),
            ("name_right", vec!["KEEP"]),
        ],
    );
    let right = test_frame(
        "districts",
        vec![("dist_id", vec!["1"]), ("name", vec!["Pune"])],
    );
    let joined = left_join(&left, &right, "district_id", "dist_id").unwrap();

    assert_eq!(
        joined.column_names(),
        vec!["district_id", "name", "name_right", "dist_id", "name_right2"]
    );
    assert_eq!(strings(&joined, "name_right"), some(&["KEEP"]));
    assert_eq!(strings(&joined, "name_right2"), some(&["Pune"]));
}

#[test]
fn left_join_rejects_duplicate_right_keys() {
    let right = test_frame(
        "districts",
        vec![
            ("dist_id", vec!["1", "2", "1.0", "1"]),
            ("dist_name", vec!["Pune", "Nagpur", "Pune East", "Pune West"]),
        ],
    );
    let left = test_frame("beneficiaries", vec![("district_id", vec!["1"])]);
    let err = left_join(&left, &right, "district_id", "dist_id").unwrap_err();
    match err {
        TransformError::Integrity(DataIntegrityError::DuplicateKey {
            table,
            column,
            count,
            ..
        }) => {
            assert_eq!(table, "districts");
            assert_eq!(column, "dist_id");
            assert_eq!(count, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn left_join_ignores_null_right_keys() {
    let right = test_frame(
        "districts",
        vec![
            ("dist_id", vec!["", "", "1"]),
            ("dist_name", vec!["Ghost", "Ghost", "Pune"]),
        ],
    );
    let left = test_frame("beneficiaries", vec![("district_id", vec!["1", ""])]);
    let joined = left_join(&left, &right, "district_id", "dist_id").unwrap();
    assert_eq!(strings(&joined, "dist_name"), some(&["Pune", ""]));
}

#[test]
fn left_join_missing_key_names_table() {
    let left = test_frame("beneficiaries", vec![("district_id", vec!["1"])]);
    let right = test_frame("districts", vec![("id", vec!["1"])]);
    let err = left_join(&left, &right, "district_id", "dist_id").unwrap_err();
    assert_eq!(
        err.to_string(),
        "column 'dist_id' not found in districts table"
    );
    assert!(matches!(
        err,
        TransformError::Schema(SchemaError::MissingColumn { .. })
    ));
}

// ============================================================================
// Age derivation
// ============================================================================

#[test]
fn derive_age_assigns_groups() {
    let frame = test_frame(
        "joined",
        vec![("dob", vec!["2007-01-01", "1994-01-01", "01/01/1980", "2006-06-01"])],
    );
    let derived = derive_age(&frame, "dob", reference_date()).unwrap();

    let ages = derived.data.column(AGE_COLUMN).unwrap().i64().unwrap();
    assert_eq!(ages.get(0), Some(17));
    assert_eq!(ages.get(1), Some(30));
    assert_eq!(ages.get(2), Some(44));
    assert_eq!(ages.get(3), Some(18));
    assert_eq!(
        strings(&derived, AGE_GROUP_COLUMN),
        some(&["Under 18", "25-30", "35+", "18-24"])
    );
}

#[test]
fn derive_age_absorbs_bad_dates() {
    let frame = test_frame(
        "joined",
        vec![
            ("dob", vec!["not a date", "", "2030-01-01", "2000-02-30"]),
            ("gender", vec!["M", "F", "M", "F"]),
        ],
    );
    let derived = derive_age(&frame, "dob", reference_date()).unwrap();

    assert_eq!(derived.record_count(), 4);
    let ages = derived.data.column(AGE_COLUMN).unwrap();
    assert_eq!(ages.null_count(), 4);
    assert_eq!(
        strings(&derived, AGE_GROUP_COLUMN),
        some(&["Unknown", "Unknown", "Unknown", "Unknown"])
    );
}

#[test]
fn derive_age_reads_short_years_and_zoned_timestamps() {
    let frame = test_frame(
        "joined",
        vec![(
            "dob",
            vec!["03/04/01", "15/08/99", "1-1-99", "2001-04-03T00:00:00Z", "0099-01-01"],
        )],
    );
    let derived = derive_age(&frame, "dob", reference_date()).unwrap();

    let ages = derived.data.column(AGE_COLUMN).unwrap().i64().unwrap();
    assert_eq!(ages.get(0), Some(23));
    assert_eq!(ages.get(1), Some(24));
    assert_eq!(ages.get(2), Some(25));
    assert_eq!(ages.get(3), Some(23));
    assert_eq!(ages.get(4), None);
    assert_eq!(
        strings(&derived, AGE_GROUP_COLUMN),
        some(&["18-24", "18-24", "25-30", "18-24", "Unknown"])
    );
}

#[test]
fn derive_age_requires_dob_column() {
    let frame = test_frame("joined", vec![("birth", vec!["2000-01-01"])]);
    let err = derive_age(&frame, "dob", reference_date()).unwrap_err();
    assert_eq!(err.to_string(), "column 'dob' not found in joined table");
}

// ============================================================================
// Cross-tabulation
// ============================================================================

#[test]
fn crosstab_orders_rows_by_total() {
    let frame = test_frame(
        "joined",
        vec![
            ("dist_name", vec!["Nagpur", "Pune", "Pune", "Pune"]),
            ("qualification", vec!["SSC", "HSC", "SSC", "HSC"]),
        ],
    );
    let matrix = crosstab(&frame, "dist_name", "qualification").unwrap();

    assert_eq!(matrix.row_labels, vec!["Pune", "Nagpur"]);
    assert_eq!(matrix.col_labels, vec!["HSC", "SSC"]);
    assert_eq!(matrix.counts, vec![vec![2, 1], vec![0, 1]]);
    assert_eq!(matrix.row_totals(), vec![3, 1]);
    assert_eq!(matrix.grand_total(), 4);
}

#[test]
fn crosstab_ties_keep_label_order_and_skip_nulls() {
    let frame = test_frame(
        "joined",
        vec![
            ("religion", vec!["Hindu", "Buddhist", "Muslim", "", "Hindu"]),
            ("gender", vec!["Male", "Female", "Male", "Male", ""]),
        ],
    );
    let matrix = crosstab(&frame, "religion", "gender").unwrap();

    assert_eq!(matrix.row_labels, vec!["Buddhist", "Hindu", "Muslim"]);
    assert_eq!(matrix.col_labels, vec!["Female", "Male"]);
    assert_eq!(matrix.get("Hindu", "Female"), Some(0));
    assert_eq!(matrix.grand_total(), 3);
}

#[test]
fn crosstab_of_empty_table_is_empty() {
    let frame = test_frame("joined", vec![("cast", vec![""]), ("gender", vec!["Male"])]);
    let matrix = crosstab(&frame, "cast", "gender").unwrap();
    assert!(matrix.is_empty());
    assert_eq!(matrix.column_count(), 0);
}

#[test]
fn crosstab_missing_column_is_schema_error() {
    let frame = test_frame("joined", vec![("cast", vec!["OBC"])]);
    let err = crosstab(&frame, "cast", "religion").unwrap_err();
    assert_eq!(err, SchemaError::missing_column("joined", "religion"));
}

#[test]
fn value_counts_sorts_by_count_then_label() {
    let frame = test_frame(
        "joined",
        vec![("gender", vec!["Male", "Female", "Male", "", "Other"])],
    );
    let table = value_counts(&frame, "GENDER").unwrap();

    assert_eq!(table.column, "gender");
    let pairs: Vec<(&str, u64)> = table
        .entries
        .iter()
        .map(|e| (e.value.as_str(), e.count))
        .collect();
    assert_eq!(pairs, vec![("Male", 2), ("Female", 1), ("Other", 1)]);
    assert_eq!(table.total(), 4);
}

#[test]
fn matrix_to_frame_has_count_columns() {
    let frame = test_frame(
        "joined",
        vec![
            ("cast", vec!["OBC", "SC", "OBC"]),
            ("gender", vec!["Male", "Female", "Female"]),
        ],
    );
    let matrix = crosstab(&frame, "cast", "gender").unwrap();
    let df = matrix_to_frame(&matrix).unwrap();

    assert_eq!(df.height(), 2);
    assert_eq!(df.width(), 3);
    let first = df.column("cast").unwrap().str().unwrap();
    assert_eq!(first.get(0), Some("OBC"));
    let female = df.column("Female").unwrap().u64().unwrap();
    assert_eq!(female.get(0), Some(1));
    assert_eq!(female.get(1), Some(1));
}
