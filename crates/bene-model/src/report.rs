//! Report payloads handed to rendering sinks.
//!
//! A report is an ordered list of [`ReportItem`]s, each pairing a title with
//! either a single-column [`FrequencyTable`] or a two-dimensional
//! [`CountMatrix`].

use serde::{Deserialize, Serialize};

/// Counts of rows by a pair of categorical attributes.
///
/// The matrix is dense: `counts[r][c]` exists for every row and column label,
/// with zero for combinations absent from the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountMatrix {
    /// Column the row labels come from.
    pub row_attr: String,
    /// Column the column labels come from.
    pub col_attr: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl CountMatrix {
    pub fn row_count(&self) -> usize {
        self.row_labels.len()
    }

    pub fn column_count(&self) -> usize {
        self.col_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }

    /// Count for a (row label, column label) pair.
    pub fn get(&self, row: &str, col: &str) -> Option<u64> {
        let r = self.row_labels.iter().position(|label| label == row)?;
        let c = self.col_labels.iter().position(|label| label == col)?;
        self.counts.get(r)?.get(c).copied()
    }

    pub fn row_total(&self, index: usize) -> u64 {
        self.counts
            .get(index)
            .map(|row| row.iter().sum())
            .unwrap_or(0)
    }

    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn column_totals(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.col_labels.len()];
        for row in &self.counts {
            for (total, count) in totals.iter_mut().zip(row) {
                *total += count;
            }
        }
        totals
    }

    pub fn grand_total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}

/// One value of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: u64,
}

/// Counts of rows per distinct value of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub column: String,
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    pub fn get(&self, value: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|entry| entry.value == value)
            .map(|entry| entry.count)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Axis and legend labels for a stacked bar chart of a matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartMeta {
    pub x_label: String,
    pub y_label: String,
    pub legend_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportPayload {
    Frequency(FrequencyTable),
    Matrix {
        matrix: CountMatrix,
        chart: ChartMeta,
    },
}

/// A titled report entry, in the order it is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportItem {
    pub title: String,
    #[serde(flatten)]
    pub payload: ReportPayload,
}

impl ReportItem {
    pub fn frequency(title: impl Into<String>, table: FrequencyTable) -> Self {
        Self {
            title: title.into(),
            payload: ReportPayload::Frequency(table),
        }
    }

    pub fn matrix(title: impl Into<String>, matrix: CountMatrix, chart: ChartMeta) -> Self {
        Self {
            title: title.into(),
            payload: ReportPayload::Matrix { matrix, chart },
        }
    }

    pub fn as_matrix(&self) -> Option<&CountMatrix> {
        match &self.payload {
            ReportPayload::Matrix { matrix, .. } => Some(matrix),
            ReportPayload::Frequency(_) => None,
        }
    }

    pub fn as_frequency(&self) -> Option<&FrequencyTable> {
        match &self.payload {
            ReportPayload::Frequency(table) => Some(table),
            ReportPayload::Matrix { .. } => None,
        }
    }
}
