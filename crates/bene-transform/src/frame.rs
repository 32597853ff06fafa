//! Named tables flowing through the pipeline.
//!
//! [`SourceFrame`] wraps a polars `DataFrame` with the table name used in
//! error messages (`beneficiaries`, `districts`, `joined`) and, optionally,
//! the file it was loaded from.

use std::path::{Path, PathBuf};

use bene_model::{CaseInsensitiveSet, SchemaError};
use polars::prelude::DataFrame;

/// Provenance of a source frame.
#[derive(Debug, Clone, Default)]
pub struct SourceFrameMeta {
    /// The file the table was read from.
    pub source_file: Option<PathBuf>,
}

/// A table with its name and optional provenance.
#[derive(Debug, Clone)]
pub struct SourceFrame {
    /// Table name used in messages (e.g. "districts").
    pub name: String,
    /// The table contents.
    pub data: DataFrame,
    pub meta: Option<SourceFrameMeta>,
}

impl SourceFrame {
    pub fn new(name: impl Into<String>, data: DataFrame) -> Self {
        Self {
            name: name.into(),
            data,
            meta: None,
        }
    }

    /// Record the file the table was loaded from.
    #[must_use]
    pub fn with_source_file(mut self, path: impl Into<PathBuf>) -> Self {
        let meta = self.meta.get_or_insert_with(SourceFrameMeta::default);
        meta.source_file = Some(path.into());
        self
    }

    /// Returns the number of records in the frame.
    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    pub fn source_file(&self) -> Option<&Path> {
        self.meta
            .as_ref()
            .and_then(|m| m.source_file.as_deref())
    }

    /// Column names in frame order.
    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names_owned()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn columns(&self) -> CaseInsensitiveSet {
        CaseInsensitiveSet::new(self.column_names())
    }

    /// Resolve a configured column name to the frame's own spelling.
    pub fn resolve_column(&self, name: &str) -> Result<String, SchemaError> {
        self.columns()
            .get(name)
            .map(str::to_string)
            .ok_or_else(|| SchemaError::missing_column(&self.name, name))
    }
}
