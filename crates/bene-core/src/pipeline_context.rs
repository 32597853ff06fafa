//! Per-run pipeline context.

use bene_ingest::IngestOptions;
use chrono::NaiveDate;

use crate::config::PipelineConfig;

/// Everything a run needs besides its inputs.
///
/// The reference date is captured once when the context is built, so every
/// age in a run is computed against the same day.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub config: PipelineConfig,
    /// Date ages are computed against.
    pub reference_date: NaiveDate,
    pub ingest: IngestOptions,
}

impl PipelineContext {
    /// Creates a context with the default configuration.
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            config: PipelineConfig::default(),
            reference_date,
            ingest: IngestOptions::default(),
        }
    }

    /// Creates a context dated today, local time.
    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_ingest_options(mut self, ingest: IngestOptions) -> Self {
        self.ingest = ingest;
        self
    }
}
