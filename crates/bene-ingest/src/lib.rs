//! Loading of the source tables.
//!
//! Both inputs are read into polars [`DataFrame`](polars::prelude::DataFrame)s
//! with nullable string columns. No value is transformed here apart from
//! trimming; an empty cell becomes null.

pub mod csv_table;
pub mod error;
pub mod load;
pub mod polars_utils;

pub use csv_table::{CsvTable, IngestOptions, read_csv_table};
pub use error::LoadError;
pub use load::{SourcePaths, load_sources, load_table};
pub use polars_utils::{any_to_string, any_to_string_non_empty, format_numeric, parse_f64};
