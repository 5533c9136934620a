#![warn(missing_docs)]
//! FluxStat Report - Run Results and Output
//!
//! Holds the result record of each strategy run and renders reports:
//! - JSON (machine-readable)
//! - CSV (spreadsheet-compatible)
//!
//! Human-readable terminal output lives in the CLI crate.

mod csv;
mod json;
mod report;

pub use csv::generate_csv_report;
pub use json::{SCHEMA_VERSION, generate_json_report};
pub use report::{
    ComparisonEntry, ComparisonResult, Report, ReportConfig, ReportMeta, ReportSummary,
    RunResult, RunStatus, SystemInfo,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
