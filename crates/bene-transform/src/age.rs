//! Age and age group derivation.

use std::time::Instant;

use bene_model::AgeGroup;
use chrono::NaiveDate;
use polars::prelude::{IntoColumn, NamedFrom, Series};
use tracing::{debug, info};

use crate::data_utils::column_values;
use crate::error::TransformError;
use crate::frame::SourceFrame;
use crate::normalization::parse_date;

pub const AGE_COLUMN: &str = "age";
pub const AGE_GROUP_COLUMN: &str = "age_group";

/// Whole years between `dob` and `reference`, counting a year as 365 days.
///
/// A birth date after the reference date has no age.
pub fn age_in_years(dob: NaiveDate, reference: NaiveDate) -> Option<i64> {
    let days = reference.signed_duration_since(dob).num_days();
    if days < 0 { None } else { Some(days / 365) }
}

/// Add `age` and `age_group` columns computed from the date of birth.
///
/// Unparseable or missing dates give a null age and the `Unknown` group; no
/// row is dropped.
pub fn derive_age(
    frame: &SourceFrame,
    dob_column: &str,
    reference_date: NaiveDate,
) -> Result<SourceFrame, TransformError> {
    let start = Instant::now();
    let dobs = column_values(frame, dob_column)?;

    let mut missing = 0usize;
    let mut unparsed = 0usize;
    let mut future = 0usize;
    let mut ages: Vec<Option<i64>> = Vec::with_capacity(dobs.len());
    for raw in &dobs {
        let age = match raw.as_deref() {
            None => {
                missing += 1;
                None
            }
            Some(text) => match parse_date(text) {
                None => {
                    unparsed += 1;
                    None
                }
                Some(dob) => {
                    let age = age_in_years(dob, reference_date);
                    if age.is_none() {
                        future += 1;
                    }
                    age
                }
            },
        };
        ages.push(age);
    }
    let groups: Vec<String> = ages
        .iter()
        .map(|age| AgeGroup::from_age(*age).label().to_string())
        .collect();

    let mut data = frame.data.clone();
    data.with_column(Series::new(AGE_COLUMN.into(), ages).into_column())?;
    data.with_column(Series::new(AGE_GROUP_COLUMN.into(), groups).into_column())?;

    if unparsed > 0 || future > 0 {
        info!(
            table = %frame.name,
            unparsed,
            future,
            "dates of birth without a usable age"
        );
    }
    debug!(
        table = %frame.name,
        reference_date = %reference_date,
        row_count = data.height(),
        missing,
        duration_ms = start.elapsed().as_millis(),
        "ages derived"
    );

    Ok(SourceFrame {
        name: frame.name.clone(),
        data,
        meta: frame.meta.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_counts_365_day_years() {
        let reference = ymd(2024, 6, 1);
        assert_eq!(age_in_years(ymd(2024, 6, 1), reference), Some(0));
        assert_eq!(age_in_years(ymd(2006, 6, 1), reference), Some(18));
        assert_eq!(age_in_years(ymd(2024, 6, 2), reference), None);
    }
}
