//! Beneficiary table transformations.
//!
//! - **frame**: named source frames wrapping a polars `DataFrame`
//! - **data_utils**: column resolution and value extraction
//! - **normalization**: categorical value substitution and date parsing
//! - **join**: key-unique left join of beneficiaries onto districts
//! - **age**: age and age group derivation
//! - **crosstab**: frequency tables and count matrices

pub mod age;
pub mod crosstab;
pub mod data_utils;
pub mod error;
pub mod frame;
pub mod join;
pub mod normalization;
pub use normalization::datetime;

pub use age::{AGE_COLUMN, AGE_GROUP_COLUMN, age_in_years, derive_age};
pub use crosstab::{crosstab, matrix_to_frame, value_counts};
pub use data_utils::{column_values, resolve_column};
pub use error::TransformError;
pub use frame::{SourceFrame, SourceFrameMeta};
pub use join::{canonical_key, left_join};
pub use normalization::{normalize_values, parse_date};
