//! Run Coordination
//!
//! Drives one strategy over the input and packages a [`RunResult`].
//!
//! ## Pipeline
//!
//! ```text
//!  data (Arc<[f64]>)          partition(n, k)   ◀── fails fast, before timing
//!        │                         │
//!        ▼                         ▼
//! ┌──────────────────────────────────────────────┐  ┐
//! │ StrategyKind::build     (pool creation)      │  │
//! │ ExecutionStrategy::run  (k slice tasks)      │  │
//! │ ExecutionStrategy::shutdown (bounded wait)   │  │ timed window
//! │ absorb failures + merge                      │  │
//! │ compute_summary                              │  │
//! └──────────────────────────────────────────────┘  ┘
//!        │
//!        ▼
//!    RunResult
//! ```
//!
//! The timed window is the same for every strategy: it opens right before
//! the executor is built and closes after the final metrics are derived.
//! Pool creation and the teardown wait are therefore included; data
//! generation and partitioning are not.

use fluxstat_core::{
    DEFAULT_SHUTDOWN_TIMEOUT, SliceFailure, SliceOutcome, SliceTask, StrategyError, StrategyKind,
    Timer, available_cores,
};
use fluxstat_report::RunResult;
use fluxstat_stats::{
    Accumulator, PartitionError, Range, compute_slice, compute_summary, partition,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Per-slice computation run inside each task
pub type SliceFn = Arc<dyn Fn(&[f64], Range) -> Accumulator + Send + Sync>;

/// Configuration for a sequence of runs
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Number of slice tasks per run (`k`)
    pub tasks: usize,
    /// Deadline for pool teardown
    pub shutdown_timeout: Duration,
    /// Unreported rounds executed before the measured one
    pub warmup_rounds: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tasks: available_cores(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            warmup_rounds: 0,
        }
    }
}

/// Errors that stop a run before any result is produced
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// Task count rejected by the partitioner
    #[error("Invalid partition request: {0}")]
    Partition(#[from] PartitionError),

    /// Executor could not be constructed
    #[error("Could not build strategy: {0}")]
    Strategy(#[from] StrategyError),
}

/// Partition, dispatch, merge and time strategy runs
pub struct Coordinator {
    config: RunConfig,
}

impl Coordinator {
    /// Create a coordinator
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run one strategy over `data` with [`compute_slice`], after any warmup rounds
    pub fn run_strategy(
        &self,
        data: &Arc<[f64]>,
        kind: &StrategyKind,
    ) -> Result<RunResult, CoordinatorError> {
        self.run_strategy_with(data, kind, Arc::new(compute_slice))
    }

    /// Run one strategy with a custom slice worker
    pub fn run_strategy_with(
        &self,
        data: &Arc<[f64]>,
        kind: &StrategyKind,
        worker: SliceFn,
    ) -> Result<RunResult, CoordinatorError> {
        let ranges = partition(data.len(), self.config.tasks)?;

        for round in 0..self.config.warmup_rounds {
            let warm = self.execute(data, kind, &ranges, &worker)?;
            tracing::debug!(
                strategy = %warm.label,
                round,
                elapsed_ms = warm.elapsed_ms,
                "warmup round"
            );
        }

        let result = self.execute(data, kind, &ranges, &worker)?;
        tracing::info!(
            strategy = %result.label,
            tasks = result.tasks,
            count = result.count,
            elapsed_ms = result.elapsed_ms,
            "run complete"
        );
        Ok(result)
    }

    /// Run every strategy in order
    pub fn run_all(
        &self,
        data: &Arc<[f64]>,
        kinds: &[StrategyKind],
    ) -> Result<Vec<RunResult>, CoordinatorError> {
        kinds
            .iter()
            .map(|kind| self.run_strategy(data, kind))
            .collect()
    }

    fn execute(
        &self,
        data: &Arc<[f64]>,
        kind: &StrategyKind,
        ranges: &[Range],
        worker: &SliceFn,
    ) -> Result<RunResult, CoordinatorError> {
        let timer = Timer::start();
        let strategy = kind.build()?;
        let label = strategy.label();

        let tasks: Vec<SliceTask> = ranges
            .iter()
            .enumerate()
            .map(|(index, &range)| {
                let data = Arc::clone(data);
                let worker = Arc::clone(worker);
                SliceTask::new(index, range, move || worker(&data[..], range))
            })
            .collect();

        let outcomes = strategy.run(tasks);
        let shutdown = strategy.shutdown(self.config.shutdown_timeout);
        if !shutdown.is_clean() {
            tracing::warn!(strategy = %label, %shutdown, "pool teardown did not finish in time");
        }

        let (total, failures) = absorb_failures(outcomes);
        let summary = compute_summary(&total);
        let elapsed_ms = timer.stop_ms();

        Ok(RunResult {
            label,
            tasks: ranges.len(),
            count: summary.count,
            min: summary.min,
            max: summary.max,
            mean: summary.mean,
            variance: summary.variance,
            std_dev: summary.std_dev,
            elapsed_ms,
            failures,
            shutdown,
        })
    }
}

/// Merge successful partials; failed slices contribute the identity.
pub fn absorb_failures(outcomes: Vec<SliceOutcome>) -> (Accumulator, Vec<SliceFailure>) {
    let mut total = Accumulator::identity();
    let mut failures = Vec::new();

    for outcome in outcomes {
        match outcome {
            Ok(partial) => total = total.merge(partial),
            Err(failure) => {
                tracing::warn!(%failure, "slice dropped from result");
                failures.push(failure);
            }
        }
    }

    (total, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxstat_core::{DEFAULT_KEEP_ALIVE, ShutdownStatus};

    fn config(tasks: usize) -> RunConfig {
        RunConfig {
            tasks,
            shutdown_timeout: Duration::from_secs(5),
            warmup_rounds: 0,
        }
    }

    fn all_kinds() -> Vec<StrategyKind> {
        vec![
            StrategyKind::Direct,
            StrategyKind::Bounded { threads: 3 },
            StrategyKind::Elastic {
                keep_alive: DEFAULT_KEEP_ALIVE,
            },
        ]
    }

    fn data(values: &[f64]) -> Arc<[f64]> {
        Arc::from(values)
    }

    #[test]
    fn test_five_values_two_tasks() {
        let coordinator = Coordinator::new(config(2));
        let input = data(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        for kind in all_kinds() {
            let r = coordinator.run_strategy(&input, &kind).unwrap();
            assert_eq!(r.label, kind.label());
            assert_eq!(r.tasks, 2);
            assert_eq!(r.count, 5);
            assert_eq!(r.min, 1.0);
            assert_eq!(r.max, 5.0);
            assert!((r.mean - 3.0).abs() < 1e-12);
            // Population variance: 55/5 - 9
            assert!((r.variance - 2.0).abs() < 1e-12);
            assert!((r.std_dev - 1.4142).abs() < 1e-4);
            assert!(r.failures.is_empty());
            assert_eq!(r.shutdown, ShutdownStatus::Completed);
            assert!(r.elapsed_ms >= 0.0);
        }
    }

    #[test]
    fn test_single_value_more_tasks_than_values() {
        let coordinator = Coordinator::new(config(4));
        let input = data(&[42.0]);

        for kind in all_kinds() {
            let r = coordinator.run_strategy(&input, &kind).unwrap();
            assert_eq!(r.tasks, 4);
            assert_eq!(r.count, 1);
            assert_eq!(r.min, 42.0);
            assert_eq!(r.max, 42.0);
            assert_eq!(r.mean, 42.0);
            assert_eq!(r.std_dev, 0.0);
        }
    }

    #[test]
    fn test_empty_input_is_nan_not_error() {
        let coordinator = Coordinator::new(config(3));
        let input = data(&[]);

        for kind in all_kinds() {
            let r = coordinator.run_strategy(&input, &kind).unwrap();
            assert_eq!(r.count, 0);
            assert!(r.mean.is_nan());
            assert!(r.std_dev.is_nan());
            assert_eq!(r.min, f64::INFINITY);
            assert_eq!(r.max, f64::NEG_INFINITY);
        }
    }

    #[test]
    fn test_zero_tasks_fails_fast() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let worker: SliceFn = Arc::new(move |d: &[f64], r: Range| {
            seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            compute_slice(d, r)
        });

        let err = Coordinator::new(config(0))
            .run_strategy_with(&data(&[1.0]), &StrategyKind::Direct, worker)
            .unwrap_err();
        assert!(matches!(err, CoordinatorError::Partition(PartitionError::ZeroTasks)));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_slice_contributes_identity() {
        // Values 1..=8 in 4 slices of 2; the slice starting at 4 holds 5 and 6
        let worker: SliceFn = Arc::new(|d: &[f64], r: Range| {
            if r.start == 4 {
                panic!("injected failure");
            }
            compute_slice(d, r)
        });
        let coordinator = Coordinator::new(config(4));
        let input: Arc<[f64]> = (1..=8).map(f64::from).collect();

        for kind in all_kinds() {
            let r = coordinator
                .run_strategy_with(&input, &kind, Arc::clone(&worker))
                .unwrap();
            assert_eq!(r.count, 6, "{}", r.label);
            assert_eq!(r.failed_slices(), 1);
            assert_eq!(r.failures[0].index, 2);
            assert_eq!(r.failures[0].range, Range::new(4, 6));
            assert_eq!(r.failures[0].message, "injected failure");
            // 36 - 11 = 25 over the six remaining values
            assert!((r.mean - 25.0 / 6.0).abs() < 1e-12);
            assert_eq!(r.min, 1.0);
            assert_eq!(r.max, 8.0);
        }
    }

    #[test]
    fn test_warmup_rounds_do_not_change_result() {
        let input: Arc<[f64]> = (0..1000).map(|i| f64::from(i % 13)).collect();
        let cold = Coordinator::new(config(4))
            .run_strategy(&input, &StrategyKind::Direct)
            .unwrap();

        let mut warm_config = config(4);
        warm_config.warmup_rounds = 2;
        let warm = Coordinator::new(warm_config)
            .run_strategy(&input, &StrategyKind::Direct)
            .unwrap();

        assert_eq!(cold.count, warm.count);
        assert_eq!(cold.mean, warm.mean);
        assert_eq!(cold.std_dev, warm.std_dev);
    }

    #[test]
    fn test_run_all_preserves_order() {
        let input: Arc<[f64]> = (0..10_000).map(|i| f64::from(i) * 0.5).collect();
        let results = Coordinator::new(config(8))
            .run_all(&input, &all_kinds())
            .unwrap();

        let labels: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["single", "fixed(3)", "cached"]);
        for r in &results[1..] {
            assert_eq!(r.count, results[0].count);
            assert_eq!(r.min, results[0].min);
            assert_eq!(r.max, results[0].max);
            assert!((r.mean - results[0].mean).abs() < 1e-9);
            assert!((r.std_dev - results[0].std_dev).abs() < 1e-6);
        }
    }

    #[test]
    fn test_absorb_failures() {
        let outcomes = vec![
            Ok(Accumulator::of(1.0)),
            Err(SliceFailure {
                index: 1,
                range: Range::new(1, 2),
                message: "x".to_string(),
            }),
            Ok(Accumulator::of(3.0)),
        ];
        let (total, failures) = absorb_failures(outcomes);
        assert_eq!(total, Accumulator::of(1.0).merge(Accumulator::of(3.0)));
        assert_eq!(failures.len(), 1);
    }
}
