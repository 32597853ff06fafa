//! Report computation and delivery.
//!
//! [`build_report_items`] computes every frequency table and count matrix
//! for a joined table. [`emit_report`] hands them to a [`ReportSink`] only
//! once all of them have been computed, so a failing report emits nothing.

use std::time::Instant;

use bene_model::{ReportItem, SchemaError};
use bene_transform::{SourceFrame, crosstab, value_counts};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::{Phase, PipelineError};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("report sink failed: {message}")]
    Failed { message: String },
}

/// Destination for report items.
pub trait ReportSink {
    /// Receive the next item, in report order.
    fn emit(&mut self, item: &ReportItem) -> Result<(), SinkError>;

    /// Called once after the last item.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps every item in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub items: Vec<ReportItem>,
    pub finished: bool,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.title.as_str()).collect()
    }
}

impl ReportSink for CollectingSink {
    fn emit(&mut self, item: &ReportItem) -> Result<(), SinkError> {
        self.items.push(item.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.finished = true;
        Ok(())
    }
}

/// Compute every configured report for a joined table.
///
/// Frequency tables come first, then cross-tabs, each in configuration
/// order. Cross-tabs are computed in parallel.
pub fn build_report_items(
    table: &SourceFrame,
    config: &PipelineConfig,
) -> Result<Vec<ReportItem>, SchemaError> {
    let columns = &config.columns;
    let mut items = Vec::with_capacity(
        config.reports.frequencies.len() + config.reports.crosstabs.len(),
    );

    for spec in &config.reports.frequencies {
        let counts = value_counts(table, columns.column_for(spec.attribute))?;
        items.push(ReportItem::frequency(spec.title(), counts));
    }

    let matrices: Vec<ReportItem> = config
        .reports
        .crosstabs
        .par_iter()
        .map(|spec| {
            let matrix = crosstab(
                table,
                columns.column_for(spec.row),
                columns.column_for(spec.column),
            )?;
            Ok(ReportItem::matrix(spec.title.clone(), matrix, spec.chart()))
        })
        .collect::<Result<_, SchemaError>>()?;
    items.extend(matrices);
    Ok(items)
}

/// Compute the report and deliver it to `sink`. Returns the item count.
pub fn emit_report(
    table: &SourceFrame,
    config: &PipelineConfig,
    sink: &mut dyn ReportSink,
) -> Result<usize, PipelineError> {
    let start = Instant::now();
    let items = build_report_items(table, config).map_err(PipelineError::at(Phase::Aggregate))?;
    debug!(
        item_count = items.len(),
        duration_ms = start.elapsed().as_millis(),
        "report computed"
    );

    for item in &items {
        sink.emit(item).map_err(PipelineError::at(Phase::Emit))?;
    }
    sink.finish().map_err(PipelineError::at(Phase::Emit))?;
    info!(item_count = items.len(), "report emitted");
    Ok(items.len())
}
