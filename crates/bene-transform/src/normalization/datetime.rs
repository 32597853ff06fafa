//! Date of birth parsing.
//!
//! Source spreadsheets carry dates in whatever format the clerk typed or the
//! export produced. Zoned timestamps are tried first, then naive timestamps,
//! then plain dates; the first format that yields a plausible year wins. A
//! timestamp keeps its local date. Ambiguous slash and dash dates read
//! month-first and fall back to day-first when the month would be invalid.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// `%Y` reads one to four digits, so `01` parses as year 1. Anything earlier
/// than this is treated as a misread short year.
const MIN_YEAR: i32 = 1000;

const ZONED_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 18] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    // chrono pivots %y at 70: 00-69 is 20xx, 70-99 is 19xx.
    "%m/%d/%y",
    "%d/%m/%y",
    "%m-%d-%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%d-%b-%y",
    "%y-%m-%d",
];

/// Parse a date in any of the accepted formats.
///
/// Returns `None` for blank or unparseable input; callers treat that as an
/// absent date rather than a failure.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    parse_zoned(trimmed)
        .or_else(|| {
            first_match(&TIMESTAMP_FORMATS, |fmt| {
                NaiveDateTime::parse_from_str(trimmed, fmt)
                    .ok()
                    .map(|dt| dt.date())
            })
        })
        .or_else(|| {
            first_match(&DATE_FORMATS, |fmt| {
                NaiveDate::parse_from_str(trimmed, fmt).ok()
            })
        })
}

fn parse_zoned(value: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
        .filter(plausible)
        .or_else(|| {
            first_match(&ZONED_FORMATS, |fmt| {
                DateTime::parse_from_str(value, fmt)
                    .ok()
                    .map(|dt| dt.date_naive())
            })
        })
}

fn first_match<F>(formats: &[&str], parse: F) -> Option<NaiveDate>
where
    F: Fn(&str) -> Option<NaiveDate>,
{
    formats
        .iter()
        .filter_map(|fmt| parse(fmt))
        .find(plausible)
}

fn plausible(date: &NaiveDate) -> bool {
    date.year() >= MIN_YEAR
}
