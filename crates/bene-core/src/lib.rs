//! Pipeline orchestration for beneficiary cross-tabulation reports.
//!
//! - **config**: column names, value mappings and the report enumeration
//! - **pipeline_context**: configuration plus the run's reference date
//! - **pipeline**: load, normalize, join, derive, then report
//! - **report**: computing report items and handing them to a sink

pub mod config;
pub mod error;
pub mod pipeline;
pub mod pipeline_context;
pub mod report;

pub use config::{
    Attribute, ColumnConfig, ConfigError, CrosstabSpec, FrequencySpec, PipelineConfig,
    ReportSpec,
};
pub use error::{Phase, PipelineError, PipelineErrorKind};
pub use pipeline::{PipelineSummary, prepare_table, run_pipeline};
pub use pipeline_context::PipelineContext;
pub use report::{CollectingSink, ReportSink, SinkError, build_report_items, emit_report};
