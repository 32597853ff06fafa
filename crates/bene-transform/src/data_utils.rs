//! DataFrame value extraction.

use bene_ingest::any_to_string_non_empty;
use bene_model::SchemaError;
use polars::prelude::AnyValue;

use crate::frame::SourceFrame;

/// Resolve `name` case-insensitively against the frame's columns.
pub fn resolve_column(frame: &SourceFrame, name: &str) -> Result<String, SchemaError> {
    frame.resolve_column(name)
}

/// Extract the trimmed values of a column. Blank cells are `None`.
pub fn column_values(frame: &SourceFrame, name: &str) -> Result<Vec<Option<String>>, SchemaError> {
    let resolved = frame.resolve_column(name)?;
    let column = frame
        .data
        .column(&resolved)
        .map_err(|_| SchemaError::missing_column(&frame.name, name))?;
    let mut values = Vec::with_capacity(frame.data.height());
    for idx in 0..frame.data.height() {
        values.push(any_to_string_non_empty(
            column.get(idx).unwrap_or(AnyValue::Null),
        ));
    }
    Ok(values)
}
