use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// A source table could not be loaded. Always fatal for the run.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed source {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },

    #[error("no header row in {}", path.display())]
    NoHeader { path: PathBuf },

    #[error("cannot build table from {}: {source}", path.display())]
    Frame {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

impl LoadError {
    /// The source the error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::NotFound { path }
            | Self::Read { path, .. }
            | Self::Malformed { path, .. }
            | Self::NoHeader { path }
            | Self::Frame { path, .. } => path,
        }
    }
}
