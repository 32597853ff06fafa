use std::collections::HashSet;
use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};

use crate::error::LoadError;

/// Options controlling how a delimited file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Field delimiter byte (default `,`).
    pub delimiter: u8,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl IngestOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Raw cells of a delimited file, header row split off.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Convert into a frame of nullable string columns. Empty cells become null.
    pub fn into_frame(self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.headers.len());
        for (idx, header) in self.headers.iter().enumerate() {
            let values: Vec<Option<String>> = self
                .rows
                .iter()
                .map(|row| {
                    let cell = row.get(idx).map(String::as_str).unwrap_or("");
                    if cell.is_empty() {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect();
            columns.push(Series::new(header.as_str().into(), values).into_column());
        }
        DataFrame::new(columns)
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a delimited file. The first non-blank row is the header.
pub fn read_csv_table(path: &Path, options: &IngestOptions) -> Result<CsvTable, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_path(path)
        .map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        match &headers {
            None => headers = Some(validate_headers(path, &row)?),
            Some(names) => {
                if row.iter().skip(names.len()).any(|cell| !cell.is_empty()) {
                    let line = record.position().map_or(0, |pos| pos.line());
                    return Err(LoadError::Malformed {
                        path: path.to_path_buf(),
                        message: format!(
                            "line {line} has {} cells but the header has {}",
                            row.len(),
                            names.len()
                        ),
                    });
                }
                let mut padded = Vec::with_capacity(names.len());
                for idx in 0..names.len() {
                    padded.push(row.get(idx).cloned().unwrap_or_default());
                }
                rows.push(padded);
            }
        }
    }

    let headers = headers.ok_or_else(|| LoadError::NoHeader {
        path: path.to_path_buf(),
    })?;
    Ok(CsvTable { headers, rows })
}

fn validate_headers(path: &Path, raw: &[String]) -> Result<Vec<String>, LoadError> {
    let headers: Vec<String> = raw.iter().map(|value| normalize_header(value)).collect();
    let mut seen = HashSet::new();
    for (idx, header) in headers.iter().enumerate() {
        if header.is_empty() {
            return Err(LoadError::Malformed {
                path: path.to_path_buf(),
                message: format!("empty column name at position {}", idx + 1),
            });
        }
        if !seen.insert(header.to_ascii_uppercase()) {
            return Err(LoadError::Malformed {
                path: path.to_path_buf(),
                message: format!("duplicate column '{header}'"),
            });
        }
    }
    Ok(headers)
}
