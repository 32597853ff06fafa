//! Data model shared by the beneficiary reporting crates.
//!
//! - [`age`]: age group classification
//! - [`error`]: schema and data integrity errors
//! - [`lookup`]: case-insensitive column name resolution
//! - [`report`]: count matrices, frequency tables and report items

pub mod age;
pub mod error;
pub mod lookup;
pub mod report;

pub use age::AgeGroup;
pub use error::{DataIntegrityError, SchemaError};
pub use lookup::CaseInsensitiveSet;
pub use report::{
    ChartMeta, CountMatrix, FrequencyEntry, FrequencyTable, ReportItem, ReportPayload,
};
