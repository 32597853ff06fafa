//! End-to-end pipeline: load, normalize, join, derive, report.

use std::time::Instant;

use bene_ingest::{SourcePaths, load_sources};
use bene_transform::{SourceFrame, derive_age, left_join, normalize_values};
use tracing::{info, info_span};

use crate::error::{Phase, PipelineError};
use crate::pipeline_context::PipelineContext;
use crate::report::{ReportSink, emit_report};

pub const BENEFICIARIES_TABLE: &str = "beneficiaries";
pub const DISTRICTS_TABLE: &str = "districts";

/// Row counts of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSummary {
    pub beneficiary_rows: usize,
    pub district_rows: usize,
    /// Gender cells rewritten by the value mapping.
    pub normalized_values: usize,
    pub items_emitted: usize,
}

/// Load both sources and build the joined table with derived age columns.
pub fn prepare_table(
    paths: &SourcePaths,
    ctx: &PipelineContext,
) -> Result<(SourceFrame, PipelineSummary), PipelineError> {
    let config = &ctx.config;
    config
        .validate()
        .map_err(PipelineError::at(Phase::Config))?;

    // =========================================================================
    // Stage 1: Load both sources concurrently
    // =========================================================================
    let load_start = Instant::now();
    let (beneficiaries, districts) = info_span!("load")
        .in_scope(|| load_sources(paths, &ctx.ingest))
        .map_err(PipelineError::at(Phase::Load))?;
    let mut beneficiaries = SourceFrame::new(BENEFICIARIES_TABLE, beneficiaries)
        .with_source_file(&paths.beneficiaries);
    let districts =
        SourceFrame::new(DISTRICTS_TABLE, districts).with_source_file(&paths.districts);
    info!(
        beneficiary_rows = beneficiaries.record_count(),
        district_rows = districts.record_count(),
        duration_ms = load_start.elapsed().as_millis(),
        "load complete"
    );

    // =========================================================================
    // Stage 2: Normalize categorical values
    // =========================================================================
    let normalized_values = info_span!("normalize")
        .in_scope(|| normalize_values(&mut beneficiaries, &config.columns.gender, &config.gender_map))
        .map_err(PipelineError::at(Phase::Normalize))?;

    // =========================================================================
    // Stage 3: Join districts onto beneficiaries
    // =========================================================================
    let joined = info_span!("join")
        .in_scope(|| {
            left_join(
                &beneficiaries,
                &districts,
                &config.columns.beneficiary_district,
                &config.columns.district_id,
            )
        })
        .map_err(PipelineError::at(Phase::Join))?;

    // =========================================================================
    // Stage 4: Derive age and age group
    // =========================================================================
    let derived = info_span!("derive", reference_date = %ctx.reference_date)
        .in_scope(|| derive_age(&joined, &config.columns.dob, ctx.reference_date))
        .map_err(PipelineError::at(Phase::Derive))?;

    let summary = PipelineSummary {
        beneficiary_rows: beneficiaries.record_count(),
        district_rows: districts.record_count(),
        normalized_values,
        items_emitted: 0,
    };
    Ok((derived, summary))
}

/// Run the whole pipeline and deliver the report to `sink`.
///
/// Nothing reaches the sink unless every phase before emission succeeds.
pub fn run_pipeline(
    paths: &SourcePaths,
    ctx: &PipelineContext,
    sink: &mut dyn ReportSink,
) -> Result<PipelineSummary, PipelineError> {
    let span = info_span!(
        "pipeline",
        beneficiaries = %paths.beneficiaries.display(),
        districts = %paths.districts.display()
    );
    let _guard = span.enter();
    let start = Instant::now();

    let (joined, mut summary) = prepare_table(paths, ctx)?;

    // =========================================================================
    // Stage 5: Aggregate and emit
    // =========================================================================
    summary.items_emitted =
        info_span!("report").in_scope(|| emit_report(&joined, &ctx.config, sink))?;

    info!(
        joined_rows = joined.record_count(),
        items = summary.items_emitted,
        duration_ms = start.elapsed().as_millis(),
        "pipeline complete"
    );
    Ok(summary)
}
