//! Report Building
//!
//! Assembles the complete report from the ordered run results.
//!
//! ```text
//!  Vec<RunResult>  +  ReportConfig
//!        │                 │
//!        │                 ▼
//!        │         build_report_meta   (system info, timestamp)
//!        ▼
//!  ComparisonResult::from_runs          (speedup vs first run)
//!  ReportSummary::from_runs             (passed / degraded tally)
//!        │
//!        ▼
//!      Report   ── JSON / CSV / human
//! ```

use super::metadata::build_report_meta;
use fluxstat_report::{ComparisonResult, Report, ReportConfig, ReportSummary, RunResult};

/// Build a complete Report from run results
pub fn build_report(
    results: Vec<RunResult>,
    config: ReportConfig,
    total_duration_ms: f64,
) -> Report {
    let comparison = ComparisonResult::from_runs(&results);
    let summary = ReportSummary::from_runs(&results, total_duration_ms);

    Report {
        meta: build_report_meta(config),
        results,
        comparison,
        summary,
    }
}
