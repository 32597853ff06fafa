//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "bene",
    version,
    about = "Beneficiary cross-tabulation reports",
    long_about = "Join beneficiary records to district names, derive age groups and\n\
                  report counts by gender, caste, district, religion, qualification\n\
                  and age group, singly and in pairs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow category values from the data to appear in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline and print every report.
    Report(ReportArgs),

    /// Show the effective column configuration.
    Columns(ColumnsArgs),
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Beneficiary records (CSV).
    #[arg(value_name = "BENEFICIARIES")]
    pub beneficiaries: PathBuf,

    /// District lookup table (CSV).
    #[arg(value_name = "DISTRICTS")]
    pub districts: PathBuf,

    /// TOML file overriding column names, value mappings or reports.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Date ages are computed against (default: today).
    #[arg(long = "as-of", value_name = "YYYY-MM-DD", value_parser = parse_as_of)]
    pub as_of: Option<NaiveDate>,

    /// Report output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormatArg,

    /// Field delimiter of both input files (`tab` for tab-separated).
    #[arg(long = "delimiter", value_name = "CHAR", default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,
}

#[derive(Parser)]
pub struct ColumnsArgs {
    /// TOML file to show instead of the defaults.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

pub fn parse_as_of(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if ch.is_ascii() => Ok(ch as u8),
                _ => Err(format!("delimiter must be a single ASCII character, got '{value}'")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_accepts_single_ascii_or_tab() {
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn report_args_parse() {
        let cli = Cli::try_parse_from([
            "bene",
            "report",
            "b.csv",
            "d.csv",
            "--as-of",
            "2024-06-01",
            "--format",
            "json",
            "--delimiter",
            "tab",
        ])
        .unwrap();
        match cli.command {
            Command::Report(args) => {
                assert_eq!(args.as_of, NaiveDate::from_ymd_opt(2024, 6, 1));
                assert_eq!(args.format, ReportFormatArg::Json);
                assert_eq!(args.delimiter, b'\t');
            }
            Command::Columns(_) => panic!("expected report command"),
        }
    }

    #[test]
    fn bad_as_of_is_rejected() {
        assert!(Cli::try_parse_from(["bene", "report", "b", "d", "--as-of", "01/06/2024"]).is_err());
    }
}
