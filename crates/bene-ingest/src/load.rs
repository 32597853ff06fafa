//! Loading of the two pipeline inputs.

use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::debug;

use crate::csv_table::{IngestOptions, read_csv_table};
use crate::error::LoadError;

/// Locations of the two source tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub beneficiaries: PathBuf,
    pub districts: PathBuf,
}

impl SourcePaths {
    pub fn new(beneficiaries: impl Into<PathBuf>, districts: impl Into<PathBuf>) -> Self {
        Self {
            beneficiaries: beneficiaries.into(),
            districts: districts.into(),
        }
    }
}

/// Load one source into a frame of nullable string columns.
pub fn load_table(path: &Path, options: &IngestOptions) -> Result<DataFrame, LoadError> {
    let start = Instant::now();
    let table = read_csv_table(path, options)?;
    let data = table.into_frame().map_err(|source| LoadError::Frame {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        source = %path.display(),
        row_count = data.height(),
        column_count = data.width(),
        duration_ms = start.elapsed().as_millis(),
        "table loaded"
    );
    Ok(data)
}

/// Load both sources concurrently and wait for both.
///
/// Returns `(beneficiaries, districts)`. When both loads fail, the
/// beneficiaries error is reported.
pub fn load_sources(
    paths: &SourcePaths,
    options: &IngestOptions,
) -> Result<(DataFrame, DataFrame), LoadError> {
    let (beneficiaries, districts) = rayon::join(
        || load_table(&paths.beneficiaries, options),
        || load_table(&paths.districts, options),
    );
    Ok((beneficiaries?, districts?))
}
