//! Categorical value substitution.

use std::collections::BTreeMap;

use polars::prelude::{IntoColumn, NamedFrom, Series};
use tracing::debug;

use crate::data_utils::column_values;
use crate::error::TransformError;
use crate::frame::SourceFrame;

/// Replace every cell of `column` that exactly matches a key of `mapping`.
///
/// Unmapped values and nulls are left unchanged. Returns the number of
/// rewritten cells.
pub fn normalize_values(
    frame: &mut SourceFrame,
    column: &str,
    mapping: &BTreeMap<String, String>,
) -> Result<usize, TransformError> {
    let resolved = frame.resolve_column(column)?;
    let values = column_values(frame, &resolved)?;
    if mapping.is_empty() {
        return Ok(0);
    }

    let mut rewritten = 0usize;
    let normalized: Vec<Option<String>> = values
        .into_iter()
        .map(|value| match value {
            Some(raw) => match mapping.get(&raw) {
                Some(replacement) => {
                    rewritten += 1;
                    Some(replacement.clone())
                }
                None => Some(raw),
            },
            None => None,
        })
        .collect();

    let series = Series::new(resolved.as_str().into(), normalized);
    frame.data.with_column(series.into_column())?;

    debug!(
        table = %frame.name,
        column = %resolved,
        rewritten,
        "categorical values normalized"
    );
    Ok(rewritten)
}
