//! Report Data Structures

use chrono::{DateTime, Utc};
use fluxstat_core::{ShutdownStatus, SliceFailure};
use serde::{Deserialize, Serialize};

/// Complete report for one invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Version, timestamp, system and workload
    pub meta: ReportMeta,
    /// One result per strategy, in run order
    pub results: Vec<RunResult>,
    /// Speedups against the first run
    pub comparison: Option<ComparisonResult>,
    /// Health tally
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report schema version
    pub schema_version: u32,
    /// FluxStat version
    pub version: String,
    /// Generation time (UTC)
    pub timestamp: DateTime<Utc>,
    /// Host description
    pub system: SystemInfo,
    /// Workload and runner settings
    pub config: ReportConfig,
}

/// Workload configuration captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of elements in the input array
    pub size: usize,
    /// Number of slice tasks per run
    pub tasks: usize,
    /// Seed used to generate the input
    pub seed: u64,
    /// Untimed rounds executed before each measured run
    pub warmup_rounds: u32,
    /// Pool teardown deadline in milliseconds
    pub shutdown_timeout_ms: f64,
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system
    pub os: String,
    /// CPU architecture
    pub arch: String,
    /// CPU model name
    pub cpu: String,
    /// Available parallelism
    pub cpu_cores: u32,
}

/// Run health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every slice contributed and teardown finished in time
    Passed,
    /// Some slices failed or teardown timed out
    Degraded,
}

/// Final result of running one strategy over the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Strategy label, e.g. `fixed(8)`
    pub label: String,
    /// Number of slice tasks dispatched
    pub tasks: usize,
    /// Number of values that contributed
    pub count: u64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Population variance
    pub variance: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Wall-clock time of the measured window
    pub elapsed_ms: f64,
    /// Slices whose contribution was dropped
    pub failures: Vec<SliceFailure>,
    /// Outcome of pool teardown
    pub shutdown: ShutdownStatus,
}

impl RunResult {
    /// Number of slices that failed and contributed nothing
    pub fn failed_slices(&self) -> usize {
        self.failures.len()
    }

    /// Passed unless slices failed or teardown timed out
    pub fn status(&self) -> RunStatus {
        if self.failures.is_empty() && self.shutdown.is_clean() {
            RunStatus::Passed
        } else {
            RunStatus::Degraded
        }
    }

    /// How many times faster this run was than `baseline`
    pub fn speedup_over(&self, baseline: &RunResult) -> f64 {
        if self.elapsed_ms > 0.0 {
            baseline.elapsed_ms / self.elapsed_ms
        } else {
            0.0
        }
    }
}

/// Timing comparison of every run against the first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Label of the baseline run
    pub baseline: String,
    /// One entry per run, baseline included
    pub entries: Vec<ComparisonEntry>,
}

/// Single entry in the comparison table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonEntry {
    /// Strategy label
    pub label: String,
    /// Elapsed milliseconds
    pub elapsed_ms: f64,
    /// Speedup vs baseline (1.0 = same, >1.0 = faster, <1.0 = slower)
    pub speedup: f64,
    /// Whether this is the baseline
    pub is_baseline: bool,
}

impl ComparisonResult {
    /// Compare every run against the first one; `None` when there are no runs
    pub fn from_runs(results: &[RunResult]) -> Option<Self> {
        let baseline = results.first()?;
        let entries = results
            .iter()
            .enumerate()
            .map(|(i, r)| ComparisonEntry {
                label: r.label.clone(),
                elapsed_ms: r.elapsed_ms,
                speedup: if i == 0 { 1.0 } else { r.speedup_over(baseline) },
                is_baseline: i == 0,
            })
            .collect();

        Some(Self {
            baseline: baseline.label.clone(),
            entries,
        })
    }
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Runs in the report
    pub total_runs: usize,
    /// Runs with no failures
    pub passed: usize,
    /// Runs with failed slices or a teardown timeout
    pub degraded: usize,
    /// Failed slices across all runs
    pub failed_slices: usize,
    /// Runs whose teardown timed out
    pub shutdown_timeouts: usize,
    /// Wall-clock time of the whole invocation
    pub total_duration_ms: f64,
}

impl ReportSummary {
    /// Tally run health across results
    pub fn from_runs(results: &[RunResult], total_duration_ms: f64) -> Self {
        let mut summary = Self {
            total_runs: results.len(),
            total_duration_ms,
            ..Default::default()
        };
        for r in results {
            match r.status() {
                RunStatus::Passed => summary.passed += 1,
                RunStatus::Degraded => summary.degraded += 1,
            }
            summary.failed_slices += r.failed_slices();
            if !r.shutdown.is_clean() {
                summary.shutdown_timeouts += 1;
            }
        }
        summary
    }

    /// Whether any run was degraded
    pub fn has_degraded(&self) -> bool {
        self.degraded > 0
    }
}
