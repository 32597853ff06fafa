use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use bene_core::{
    Phase, PipelineConfig, PipelineContext, PipelineError, PipelineSummary, ReportSink,
    SinkError, run_pipeline,
};
use bene_ingest::{IngestOptions, SourcePaths};
use bene_model::{ReportItem, ReportPayload};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use tracing::{info, trace};

use crate::cli::{ColumnsArgs, ReportArgs, ReportFormatArg};
use crate::logging::redact_value;
use crate::render::{JsonSink, TableSink};

/// Load the config file, if any, over the defaults.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig, PipelineError> {
    match path {
        Some(path) => PipelineConfig::load(path).map_err(PipelineError::at(Phase::Config)),
        None => Ok(PipelineConfig::default()),
    }
}

/// Build the run context from the report flags.
pub fn report_context(args: &ReportArgs) -> Result<PipelineContext, PipelineError> {
    let config = load_config(args.config.as_deref())?;
    let ctx = match args.as_of {
        Some(date) => PipelineContext::new(date),
        None => PipelineContext::today(),
    };
    Ok(ctx
        .with_config(config)
        .with_ingest_options(IngestOptions::default().with_delimiter(args.delimiter)))
}

/// Run the pipeline and write the report to `out`.
pub fn run_report<W: Write>(args: &ReportArgs, styled: bool, out: W) -> Result<PipelineSummary> {
    let ctx = report_context(args)?;
    let paths = SourcePaths::new(&args.beneficiaries, &args.districts);
    info!(
        reference_date = %ctx.reference_date,
        format = ?args.format,
        "starting report"
    );

    let summary = match args.format {
        ReportFormatArg::Table => {
            let mut sink = TracingSink::new(TableSink::new(out).with_styling(styled));
            run_pipeline(&paths, &ctx, &mut sink)?
        }
        ReportFormatArg::Json => {
            let mut sink = TracingSink::new(JsonSink::new(out));
            run_pipeline(&paths, &ctx, &mut sink)?
        }
    };
    Ok(summary)
}

pub fn run_columns(args: &ColumnsArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let table = columns_table(&config);
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{table}")?;
    Ok(())
}

/// The effective column names and gender mapping.
pub fn columns_table(config: &PipelineConfig) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Setting"), header_cell("Column")]);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for (setting, column) in config.columns.entries() {
        table.add_row(vec![Cell::new(setting), Cell::new(column)]);
    }
    for (from, to) in &config.gender_map {
        table.add_row(vec![
            Cell::new(format!("gender_map.{from}")).fg(Color::DarkGrey),
            Cell::new(to),
        ]);
    }
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Logs each frequency value at trace level before forwarding the item.
struct TracingSink<S> {
    inner: S,
}

impl<S: ReportSink> TracingSink<S> {
    fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: ReportSink> ReportSink for TracingSink<S> {
    fn emit(&mut self, item: &ReportItem) -> Result<(), SinkError> {
        if let ReportPayload::Frequency(table) = &item.payload {
            for entry in &table.entries {
                trace!(
                    title = %item.title,
                    value = %redact_value(&entry.value),
                    count = entry.count,
                    "frequency"
                );
            }
        }
        self.inner.emit(item)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.inner.finish()
    }
}
