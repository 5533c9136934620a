//! Output Formatting
//!
//! Human-readable output formatting for run reports.
//!
//! Generates terminal-friendly output with:
//! - Workload header (size, cores, tasks)
//! - One table row per strategy (`min | max | mean | stddev | time`)
//! - Speedup of every strategy over the first
//! - Details of degraded runs (failed slices, teardown timeouts)

use fluxstat_report::{Report, RunStatus};

const MIN_LABEL_WIDTH: usize = 8;

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();
    let config = &report.meta.config;

    output.push('\n');
    output.push_str("FluxStat Results\n");
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "n = {}  cores = {}  tasks = {}  seed = {}\n\n",
        group_thousands(config.size),
        report.meta.system.cpu_cores,
        config.tasks,
        config.seed
    ));

    // Label column grows for long labels such as fixed(128)
    let width = report
        .results
        .iter()
        .map(|r| r.label.len())
        .max()
        .unwrap_or(0)
        .max(MIN_LABEL_WIDTH);

    output.push_str(&format!(
        "{:<width$} | {:<10} | {:<10} | {:<10} | {:<10} | time (ms)\n",
        "Pool", "min", "max", "mean", "stddev"
    ));
    output.push_str(&"-".repeat(width + 1));
    output.push_str("|------------|------------|------------|------------|---------\n");

    for r in &report.results {
        let marker = match r.status() {
            RunStatus::Passed => "",
            RunStatus::Degraded => "  (degraded)",
        };
        output.push_str(&format!(
            "{:<width$} | {:>10.2} | {:>10.2} | {:>10.2} | {:>10.2} | {:.2}{}\n",
            r.label, r.min, r.max, r.mean, r.std_dev, r.elapsed_ms, marker
        ));
    }

    if let Some(cmp) = &report.comparison {
        let speedups: Vec<String> = cmp
            .entries
            .iter()
            .filter(|e| !e.is_baseline)
            .map(|e| format!("{} = {:.2}x", e.label, e.speedup))
            .collect();
        if !speedups.is_empty() {
            output.push_str(&format!(
                "\nSpeedup vs {}: {}\n",
                cmp.baseline,
                speedups.join(", ")
            ));
        }
    }

    let degraded: Vec<_> = report
        .results
        .iter()
        .filter(|r| r.status() == RunStatus::Degraded)
        .collect();
    if !degraded.is_empty() {
        output.push_str("\nDegraded Runs\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for r in degraded {
            output.push_str(&format!("  ✗ {}\n", r.label));
            for failure in &r.failures {
                output.push_str(&format!("      {failure}\n"));
            }
            if !r.shutdown.is_clean() {
                output.push_str(&format!("      shutdown {}\n", r.shutdown));
            }
        }
    }

    // Summary
    output.push_str("\nSummary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Runs: {}  Passed: {}  Degraded: {}  Failed slices: {}  Shutdown timeouts: {}\n",
        report.summary.total_runs,
        report.summary.passed,
        report.summary.degraded,
        report.summary.failed_slices,
        report.summary.shutdown_timeouts
    ));
    output.push_str(&format!(
        "  Duration: {:.2} ms\n",
        report.summary.total_duration_ms
    ));

    output
}

/// `20000000` -> `20,000,000`
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
