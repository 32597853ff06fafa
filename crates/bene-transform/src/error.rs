use bene_model::{DataIntegrityError, SchemaError};
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Integrity(#[from] DataIntegrityError),

    #[error("table operation failed: {0}")]
    Polars(#[from] PolarsError),
}
