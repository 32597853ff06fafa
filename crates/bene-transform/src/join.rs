//! Left join of beneficiaries onto the district lookup table.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use bene_ingest::{format_numeric, parse_f64};
use bene_model::DataIntegrityError;
use polars::prelude::{IntoColumn, NamedFrom, Series};
use tracing::{debug, info};

use crate::data_utils::column_values;
use crate::error::TransformError;
use crate::frame::SourceFrame;

/// Suffix appended to right-table columns whose name is already taken.
pub const RIGHT_SUFFIX: &str = "_right";

/// Name of the frame produced by [`left_join`].
pub const JOINED_TABLE: &str = "joined";

/// Largest integer an `f64` represents exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Canonical form of a join key.
///
/// Spreadsheet exports store integer ids as floats (`7.0`) or with leading
/// zeros (`07`); all numeric spellings of the same value compare equal.
/// Blank keys never match.
pub fn canonical_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match parse_f64(trimmed) {
        Some(value) if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER => {
            Some(format!("{}", value as i64))
        }
        Some(value) => Some(format_numeric(value)),
        None => Some(trimmed.to_string()),
    }
}

/// Left join `right` onto `left` by key.
///
/// Every left row appears exactly once and in its original order. Right
/// columns are appended with nulls where no right row matches. The right key
/// must be unique, otherwise [`DataIntegrityError::DuplicateKey`] is
/// returned. When both key columns share a name the right key is dropped.
pub fn left_join(
    left: &SourceFrame,
    right: &SourceFrame,
    left_key: &str,
    right_key: &str,
) -> Result<SourceFrame, TransformError> {
    let start = Instant::now();
    let left_key_name = left.resolve_column(left_key)?;
    let right_key_name = right.resolve_column(right_key)?;

    let right_index = build_key_index(right, &right_key_name)?;

    let left_keys = column_values(left, &left_key_name)?;
    let matches: Vec<Option<usize>> = left_keys
        .iter()
        .map(|key| {
            key.as_deref()
                .and_then(canonical_key)
                .and_then(|key| right_index.get(&key).copied())
        })
        .collect();
    let unmatched = matches.iter().filter(|m| m.is_none()).count();

    let mut data = left.data.clone();
    let mut taken: HashSet<String> = left
        .column_names()
        .iter()
        .map(|name| name.to_ascii_lowercase())
        .collect();
    let drop_right_key = left_key_name.eq_ignore_ascii_case(&right_key_name);
    for name in right.column_names() {
        if drop_right_key && name == right_key_name {
            continue;
        }
        let values = column_values(right, &name)?;
        let joined: Vec<Option<String>> = matches
            .iter()
            .map(|m| m.and_then(|idx| values[idx].clone()))
            .collect();
        let output_name = free_column_name(&taken, name);
        taken.insert(output_name.to_ascii_lowercase());
        data.with_column(Series::new(output_name.as_str().into(), joined).into_column())?;
    }

    if unmatched > 0 {
        info!(
            left = %left.name,
            right = %right.name,
            unmatched,
            "rows without a matching {} record",
            right.name
        );
    }
    debug!(
        row_count = data.height(),
        column_count = data.width(),
        duration_ms = start.elapsed().as_millis(),
        "left join complete"
    );
    Ok(SourceFrame::new(JOINED_TABLE, data))
}

/// `name` if no column already uses it, otherwise the first free
/// `{name}_right`, `{name}_right2`, ... spelling. Case is ignored.
fn free_column_name(taken: &HashSet<String>, name: String) -> String {
    if !taken.contains(&name.to_ascii_lowercase()) {
        return name;
    }
    let base = format!("{name}{RIGHT_SUFFIX}");
    let mut candidate = base.clone();
    let mut n = 2;
    while taken.contains(&candidate.to_ascii_lowercase()) {
        candidate = format!("{base}{n}");
        n += 1;
    }
    candidate
}

/// Map each canonical right key to its row, rejecting duplicates.
fn build_key_index(
    right: &SourceFrame,
    key_column: &str,
) -> Result<HashMap<String, usize>, TransformError> {
    let keys = column_values(right, key_column)?;
    let mut index: HashMap<String, usize> = HashMap::with_capacity(keys.len());
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_duplicate: Option<(String, String)> = None;
    for (row, raw) in keys.iter().enumerate() {
        let Some(raw) = raw.as_deref() else {
            continue;
        };
        let Some(key) = canonical_key(raw) else {
            continue;
        };
        *counts.entry(key.clone()).or_insert(0) += 1;
        if index.contains_key(&key) {
            if first_duplicate.is_none() {
                first_duplicate = Some((key, raw.to_string()));
            }
        } else {
            index.insert(key, row);
        }
    }

    if let Some((key, raw)) = first_duplicate {
        return Err(DataIntegrityError::DuplicateKey {
            table: right.name.clone(),
            column: key_column.to_string(),
            value: raw,
            count: counts.get(&key).copied().unwrap_or(2),
        }
        .into());
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_keys_are_canonical() {
        assert_eq!(canonical_key("7"), Some("7".to_string()));
        assert_eq!(canonical_key(" 7.0 "), Some("7".to_string()));
        assert_eq!(canonical_key("07"), Some("7".to_string()));
        assert_eq!(canonical_key("7.50"), Some("7.5".to_string()));
    }

    #[test]
    fn text_keys_are_trimmed() {
        assert_eq!(canonical_key(" PUN "), Some("PUN".to_string()));
        assert_eq!(canonical_key("   "), None);
    }

    #[test]
    fn suffixed_names_skip_taken_ones() {
        let taken: HashSet<String> = ["name", "name_right", "NAME_RIGHT2"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(free_column_name(&taken, "dist_name".into()), "dist_name");
        assert_eq!(free_column_name(&taken, "Name".into()), "Name_right3");
    }
}
