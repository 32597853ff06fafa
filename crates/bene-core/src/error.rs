use std::fmt;

use bene_ingest::LoadError;
use bene_model::{DataIntegrityError, SchemaError};
use bene_transform::TransformError;
use polars::prelude::PolarsError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::report::SinkError;

/// Stage of a run, named in fatal error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Config,
    Load,
    Normalize,
    Join,
    Derive,
    Aggregate,
    Emit,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Config => "config",
            Phase::Load => "load",
            Phase::Normalize => "normalize",
            Phase::Join => "join",
            Phase::Derive => "derive",
            Phase::Aggregate => "aggregate",
            Phase::Emit => "emit",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PipelineErrorKind {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Integrity(#[from] DataIntegrityError),
    #[error("table operation failed: {0}")]
    Table(#[from] PolarsError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl From<TransformError> for PipelineErrorKind {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::Schema(err) => Self::Schema(err),
            TransformError::Integrity(err) => Self::Integrity(err),
            TransformError::Polars(err) => Self::Table(err),
        }
    }
}

/// A fatal error, tagged with the phase it stopped the run in.
#[derive(Debug, Error)]
#[error("{phase} phase failed: {kind}")]
pub struct PipelineError {
    pub phase: Phase,
    #[source]
    pub kind: PipelineErrorKind,
}

impl PipelineError {
    pub fn new(phase: Phase, kind: impl Into<PipelineErrorKind>) -> Self {
        Self {
            phase,
            kind: kind.into(),
        }
    }

    /// Closure for `map_err` tagging an error with `phase`.
    pub fn at<E: Into<PipelineErrorKind>>(phase: Phase) -> impl FnOnce(E) -> Self {
        move |err| Self::new(phase, err)
    }
}
