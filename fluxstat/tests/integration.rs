//! Integration tests for FluxStat
//!
//! These tests verify the end-to-end behavior of the reduction across all
//! execution strategies.

use fluxstat::prelude::*;
use fluxstat::{
    DEFAULT_KEEP_ALIVE, OutputFormat, RunStatus, SliceFn, StatConfig, build_report,
    generate_csv_report, generate_data, generate_json_report, merge_all, run_report,
};
use fluxstat_report::ReportConfig;
use std::sync::Arc;
use std::time::Duration;

fn strategies(threads: usize) -> Vec<StrategyKind> {
    vec![
        StrategyKind::Direct,
        StrategyKind::Bounded { threads },
        StrategyKind::Elastic {
            keep_alive: DEFAULT_KEEP_ALIVE,
        },
    ]
}

fn run_config(tasks: usize) -> RunConfig {
    RunConfig {
        tasks,
        shutdown_timeout: Duration::from_secs(5),
        warmup_rounds: 0,
    }
}

/// Every strategy produces the same statistics for the same input
#[test]
fn test_strategies_agree_on_generated_input() {
    let data = generate_data(250_000, 42, 0.0, 1_000_000.0).unwrap();
    let results = Coordinator::new(run_config(8))
        .run_all(&data, &strategies(4))
        .unwrap();

    let baseline = &results[0];
    assert_eq!(baseline.count, 250_000);
    assert!(baseline.min >= 0.0);
    assert!(baseline.max < 1_000_000.0);
    // Uniform on [0, 1e6): mean ~5e5, stddev ~2.887e5
    assert!((baseline.mean - 500_000.0).abs() < 5_000.0);
    assert!((baseline.std_dev - 288_675.0).abs() < 5_000.0);

    for r in &results {
        assert_eq!(r.status(), RunStatus::Passed, "{}", r.label);
        assert_eq!(r.count, baseline.count);
        assert_eq!(r.min, baseline.min);
        assert_eq!(r.max, baseline.max);
        assert!((r.mean - baseline.mean).abs() <= 1e-6 * baseline.mean.abs());
        assert!((r.std_dev - baseline.std_dev).abs() <= 1e-6 * baseline.std_dev);
    }
}

/// Results match a direct sequential computation over the whole array
#[test]
fn test_matches_sequential_reference() {
    let values: Vec<f64> = (0..10_007).map(|i| ((i * 7919) % 1013) as f64 - 500.0).collect();
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    let data: Arc<[f64]> = Arc::from(values);
    for kind in strategies(3) {
        let r = Coordinator::new(run_config(7))
            .run_strategy(&data, &kind)
            .unwrap();
        assert_eq!(r.count, 10_007);
        assert_eq!(r.min, -500.0);
        assert_eq!(r.max, 512.0);
        assert!((r.mean - mean).abs() < 1e-9);
        assert!((r.variance - variance).abs() < 1e-6 * variance);
    }
}

/// The partition of any input covers it exactly once
#[test]
fn test_partition_covers_input() {
    let data: Vec<f64> = (0..101).map(f64::from).collect();
    let full = compute_slice(&data, Range::new(0, data.len()));

    for k in [1, 2, 3, 7, 100, 101, 150] {
        let ranges = partition(data.len(), k).unwrap();
        assert_eq!(ranges.len(), k);
        assert_eq!(ranges.iter().map(Range::len).sum::<usize>(), data.len());
        let merged = merge_all(ranges.iter().map(|r| compute_slice(&data, *r)));
        assert_eq!(merged, full, "k={k}");
    }
}

/// A failing slice lowers the count and marks the run degraded
#[test]
fn test_failed_slice_is_reported() {
    let data: Arc<[f64]> = (0..100).map(f64::from).collect();
    let worker: SliceFn = Arc::new(|d: &[f64], r: Range| {
        if r.start == 0 {
            panic!("first slice fails");
        }
        compute_slice(d, r)
    });

    let coordinator = Coordinator::new(run_config(4));
    let mut results = Vec::new();
    for kind in strategies(2) {
        let r = coordinator
            .run_strategy_with(&data, &kind, Arc::clone(&worker))
            .unwrap();
        assert_eq!(r.count, 75, "{}", r.label);
        assert_eq!(r.min, 25.0);
        assert_eq!(r.status(), RunStatus::Degraded);
        assert_eq!(r.failures[0].message, "first slice fails");
        results.push(r);
    }

    let report = build_report(
        results,
        ReportConfig {
            size: 100,
            tasks: 4,
            seed: 0,
            warmup_rounds: 0,
            shutdown_timeout_ms: 5_000.0,
        },
        1.0,
    );
    assert!(report.summary.has_degraded());
    assert_eq!(report.summary.degraded, 3);
    assert_eq!(report.summary.failed_slices, 3);
}

/// The measured window covers the slice work
#[test]
fn test_elapsed_covers_work() {
    let data: Arc<[f64]> = Arc::from(vec![1.0; 8]);
    let worker: SliceFn = Arc::new(|d: &[f64], r: Range| {
        std::thread::sleep(Duration::from_millis(10));
        compute_slice(d, r)
    });

    let r = Coordinator::new(run_config(4))
        .run_strategy_with(&data, &StrategyKind::Direct, worker)
        .unwrap();
    // Four sequential slices of at least 10ms each
    assert!(r.elapsed_ms >= 40.0, "elapsed {}", r.elapsed_ms);
}

/// Empty input and zero tasks
#[test]
fn test_edge_inputs() {
    let empty: Arc<[f64]> = Arc::from(Vec::new());
    for kind in strategies(2) {
        let r = Coordinator::new(run_config(2))
            .run_strategy(&empty, &kind)
            .unwrap();
        assert_eq!(r.count, 0);
        assert!(r.mean.is_nan());
        assert!(r.std_dev.is_nan());
    }

    let data: Arc<[f64]> = Arc::from(vec![1.0, 2.0]);
    assert!(
        Coordinator::new(run_config(0))
            .run_strategy(&data, &StrategyKind::Direct)
            .is_err()
    );
}

/// Full pipeline from configuration to rendered reports
#[test]
fn test_report_pipeline() {
    let mut config = StatConfig::default();
    config.workload.size = 20_000;
    config.workload.seed = 7;
    config.runner.tasks = Some(4);
    config.runner.threads = Some(2);
    config.runner.warmup_rounds = 1;

    let report = run_report(&config, None, false).unwrap();
    let labels: Vec<&str> = report.results.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["single", "fixed(2)", "cached"]);
    assert_eq!(report.meta.config.warmup_rounds, 1);
    assert!(!report.summary.has_degraded());

    let json = generate_json_report(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["results"].as_array().unwrap().len(), 3);
    assert_eq!(value["results"][1]["shutdown"]["status"], "completed");
    assert_eq!(value["comparison"]["baseline"], "single");

    let csv = generate_csv_report(&report);
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().starts_with("label,tasks,count"));
    assert!(lines.next().unwrap().starts_with("single,4,20000,"));

    assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
}

/// Same seed, same statistics
#[test]
fn test_reproducible_runs() {
    let mut config = StatConfig::default();
    config.workload.size = 5_000;
    config.runner.tasks = Some(3);
    config.runner.strategies = vec!["single".into()];

    let a = run_report(&config, None, false).unwrap();
    let b = run_report(&config, None, false).unwrap();
    assert_eq!(a.results[0].mean, b.results[0].mean);
    assert_eq!(a.results[0].min, b.results[0].min);
    assert_eq!(a.results[0].max, b.results[0].max);
}
