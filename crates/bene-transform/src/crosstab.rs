//! Frequency tables and two-way count matrices.
//!
//! Both ignore null cells. Labels are compared exactly; normalization
//! happens before aggregation.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use bene_model::{CountMatrix, FrequencyEntry, FrequencyTable, SchemaError};
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};
use tracing::debug;

use crate::data_utils::column_values;
use crate::frame::SourceFrame;

/// Count the non-null values of one column.
///
/// Entries are ordered by descending count, ties by ascending value.
pub fn value_counts(frame: &SourceFrame, column: &str) -> Result<FrequencyTable, SchemaError> {
    let resolved = frame.resolve_column(column)?;
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for value in column_values(frame, &resolved)?.into_iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut entries: Vec<FrequencyEntry> = counts
        .into_iter()
        .map(|(value, count)| FrequencyEntry { value, count })
        .collect();
    entries.sort_by_key(|entry| Reverse(entry.count));
    Ok(FrequencyTable {
        column: resolved,
        entries,
    })
}

/// Count rows by a pair of attributes.
///
/// Rows with a null in either attribute are skipped. The result is dense:
/// missing combinations count zero. Columns are ordered by label; rows by
/// descending total, ties keeping ascending label order.
pub fn crosstab(
    frame: &SourceFrame,
    row_attr: &str,
    col_attr: &str,
) -> Result<CountMatrix, SchemaError> {
    let row_name = frame.resolve_column(row_attr)?;
    let col_name = frame.resolve_column(col_attr)?;
    let row_values = column_values(frame, &row_name)?;
    let col_values = column_values(frame, &col_name)?;

    let mut pairs: BTreeMap<(String, String), u64> = BTreeMap::new();
    let mut col_labels: BTreeSet<String> = BTreeSet::new();
    for (row, col) in row_values.into_iter().zip(col_values) {
        if let (Some(row), Some(col)) = (row, col) {
            col_labels.insert(col.clone());
            *pairs.entry((row, col)).or_insert(0) += 1;
        }
    }
    let col_labels: Vec<String> = col_labels.into_iter().collect();
    let col_positions: BTreeMap<&str, usize> = col_labels
        .iter()
        .enumerate()
        .map(|(idx, label)| (label.as_str(), idx))
        .collect();

    // Grouped rows in ascending label order.
    let mut grouped: Vec<(String, Vec<u64>)> = Vec::new();
    for ((row, col), count) in &pairs {
        if grouped.last().is_none_or(|(label, _)| label != row) {
            grouped.push((row.clone(), vec![0; col_labels.len()]));
        }
        if let (Some((_, cells)), Some(&idx)) = (grouped.last_mut(), col_positions.get(col.as_str()))
        {
            cells[idx] = *count;
        }
    }
    grouped.sort_by_key(|(_, cells)| Reverse(cells.iter().sum::<u64>()));

    let (row_labels, counts): (Vec<String>, Vec<Vec<u64>>) = grouped.into_iter().unzip();
    debug!(
        row_attr = %row_name,
        col_attr = %col_name,
        rows = row_labels.len(),
        columns = col_labels.len(),
        "cross-tabulation computed"
    );
    Ok(CountMatrix {
        row_attr: row_name,
        col_attr: col_name,
        row_labels,
        col_labels,
        counts,
    })
}

/// Convert a matrix to a frame: the row attribute column followed by one
/// `UInt64` column per column label.
pub fn matrix_to_frame(matrix: &CountMatrix) -> PolarsResult<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(matrix.column_count() + 1);
    columns.push(Series::new(matrix.row_attr.as_str().into(), matrix.row_labels.clone()).into_column());
    for (idx, label) in matrix.col_labels.iter().enumerate() {
        let values: Vec<u64> = matrix.counts.iter().map(|row| row[idx]).collect();
        columns.push(Series::new(label.as_str().into(), values).into_column());
    }
    DataFrame::new(columns)
}
