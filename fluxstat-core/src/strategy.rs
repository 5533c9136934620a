//! Execution Strategy Abstraction
//!
//! A strategy runs a batch of independent slice tasks and hands back one
//! outcome per task, in submission order. Returning from
//! [`ExecutionStrategy::run`] means every task has finished; nothing runs
//! past the call boundary.
//!
//! ```text
//! Vec<SliceTask> ──▶ ExecutionStrategy::run ──▶ Vec<SliceOutcome>
//!                         │
//!          ┌──────────────┼──────────────┐
//!          ▼              ▼              ▼
//!       Direct       BoundedPool     ElasticPool
//!   (caller thread)  (rayon, fixed)  (on-demand threads)
//! ```
//!
//! A task that panics is caught and reported as a [`SliceFailure`]; it never
//! takes down the pool or its sibling tasks.

use crate::bounded::BoundedPool;
use crate::direct::Direct;
use crate::elastic::ElasticPool;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use fluxstat_stats::{Accumulator, Range};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default idle time before an elastic worker retires
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(60);

/// Default deadline for pool teardown
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of parallel execution units available to this process
pub fn available_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Boxed slice computation
pub type SliceJob = Box<dyn FnOnce() -> Accumulator + Send + 'static>;

/// Outcome of one slice task
pub type SliceOutcome = Result<Accumulator, SliceFailure>;

/// One unit of work: a slice computation tagged with its position and range
pub struct SliceTask {
    index: usize,
    range: Range,
    job: SliceJob,
}

impl SliceTask {
    /// Wrap a computation over `range`; `index` is the task's position in the batch
    pub fn new<F>(index: usize, range: Range, job: F) -> Self
    where
        F: FnOnce() -> Accumulator + Send + 'static,
    {
        Self {
            index,
            range,
            job: Box::new(job),
        }
    }

    /// Position of this task in its batch
    pub fn index(&self) -> usize {
        self.index
    }

    /// Range this task covers
    pub fn range(&self) -> Range {
        self.range
    }

    /// Failure recorded for a task that never reported back
    pub fn not_run(&self, reason: impl Into<String>) -> SliceFailure {
        SliceFailure {
            index: self.index,
            range: self.range,
            message: reason.into(),
        }
    }

    /// Run the computation, catching panics
    pub fn run(self) -> SliceOutcome {
        let Self { index, range, job } = self;
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)).map_err(|panic| {
            let message = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            SliceFailure {
                index,
                range,
                message,
            }
        })
    }
}

impl std::fmt::Debug for SliceTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliceTask")
            .field("index", &self.index)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

/// A slice task that panicked or could not be dispatched
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("slice {index} {range} failed: {message}")]
pub struct SliceFailure {
    /// Position of the task in its batch
    pub index: usize,
    /// Range the task covered
    pub range: Range,
    /// Panic payload or dispatch error
    pub message: String,
}

/// Result of waiting for pool workers to exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShutdownStatus {
    /// Every worker exited before the deadline
    Completed,
    /// Deadline passed with workers still alive
    TimedOut {
        /// Workers still running at the deadline
        remaining: usize,
    },
}

impl ShutdownStatus {
    /// Whether teardown finished in time
    pub fn is_clean(self) -> bool {
        matches!(self, ShutdownStatus::Completed)
    }
}

impl std::fmt::Display for ShutdownStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownStatus::Completed => write!(f, "completed"),
            ShutdownStatus::TimedOut { remaining } => {
                write!(f, "timed out ({remaining} worker(s) still running)")
            }
        }
    }
}

/// Errors building a strategy
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Rayon refused to build the fixed pool
    #[error("Failed to build thread pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),

    /// Strategy name not recognised
    #[error("Unknown strategy: {0} (expected single, fixed, fixed(N) or cached)")]
    UnknownStrategy(String),

    /// Pool size of zero
    #[error("Pool size must be at least 1")]
    ZeroThreads,
}

/// A way of running a batch of independent slice tasks
pub trait ExecutionStrategy: Send {
    /// Label used in reports, e.g. `fixed(8)`
    fn label(&self) -> String;

    /// Run every task exactly once and return their outcomes in input order.
    ///
    /// Blocks until all tasks have completed or failed.
    fn run(&self, tasks: Vec<SliceTask>) -> Vec<SliceOutcome>;

    /// Tear the strategy down, waiting at most `deadline` for workers to exit.
    fn shutdown(self: Box<Self>, deadline: Duration) -> ShutdownStatus;
}

/// Configuration-time choice of strategy; builds a fresh executor per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyKind {
    /// Sequential on the calling thread
    Direct,
    /// Fixed number of reusable workers
    Bounded {
        /// Worker thread count
        threads: usize,
    },
    /// Threads created on demand, idle ones reused
    Elastic {
        /// Idle time before a worker retires
        keep_alive: Duration,
    },
}

impl StrategyKind {
    /// Parse a strategy name: `single`/`direct`, `fixed`/`bounded`, `fixed(N)`,
    /// `cached`/`elastic`. Bare `fixed` uses `default_threads`.
    pub fn parse(
        name: &str,
        default_threads: usize,
        keep_alive: Duration,
    ) -> Result<Self, StrategyError> {
        let name = name.trim().to_lowercase();
        let kind = match name.as_str() {
            "single" | "direct" => StrategyKind::Direct,
            "fixed" | "bounded" => StrategyKind::Bounded {
                threads: default_threads,
            },
            "cached" | "elastic" => StrategyKind::Elastic { keep_alive },
            other => {
                let threads = other
                    .strip_prefix("fixed(")
                    .or_else(|| other.strip_prefix("bounded("))
                    .and_then(|rest| rest.strip_suffix(')'))
                    .and_then(|n| n.trim().parse::<usize>().ok())
                    .ok_or_else(|| StrategyError::UnknownStrategy(other.to_string()))?;
                StrategyKind::Bounded { threads }
            }
        };

        if let StrategyKind::Bounded { threads: 0 } = kind {
            return Err(StrategyError::ZeroThreads);
        }
        Ok(kind)
    }

    /// Label the built strategy will report
    pub fn label(&self) -> String {
        match self {
            StrategyKind::Direct => "single".to_string(),
            StrategyKind::Bounded { threads } => format!("fixed({threads})"),
            StrategyKind::Elastic { .. } => "cached".to_string(),
        }
    }

    /// Build a fresh executor
    pub fn build(&self) -> Result<Box<dyn ExecutionStrategy>, StrategyError> {
        let strategy: Box<dyn ExecutionStrategy> = match *self {
            StrategyKind::Direct => Box::new(Direct),
            StrategyKind::Bounded { threads } => Box::new(BoundedPool::new(threads)?),
            StrategyKind::Elastic { keep_alive } => Box::new(ElasticPool::new(keep_alive)),
        };
        tracing::debug!(strategy = %strategy.label(), "built execution strategy");
        Ok(strategy)
    }
}

/// Wait until `live` drops to zero, consuming one exit notification per
/// worker, or until `deadline` elapses.
pub(crate) fn await_exits(
    exits: &Receiver<()>,
    live: &AtomicUsize,
    deadline: Duration,
) -> ShutdownStatus {
    let deadline_at = Instant::now() + deadline;
    while live.load(Ordering::Acquire) > 0 {
        match exits.recv_deadline(deadline_at) {
            Ok(()) => {}
            Err(RecvTimeoutError::Timeout) => {
                let remaining = live.load(Ordering::Acquire);
                if remaining == 0 {
                    break;
                }
                return ShutdownStatus::TimedOut { remaining };
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    ShutdownStatus::Completed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_run_success() {
        let task = SliceTask::new(0, Range::new(0, 1), || Accumulator::of(2.0));
        assert_eq!(task.run(), Ok(Accumulator::of(2.0)));
    }

    #[test]
    fn test_task_panic_is_caught() {
        let task = SliceTask::new(3, Range::new(6, 8), || panic!("boom"));
        let failure = task.run().unwrap_err();
        assert_eq!(failure.index, 3);
        assert_eq!(failure.range, Range::new(6, 8));
        assert_eq!(failure.message, "boom");
    }

    #[test]
    fn test_task_panic_with_formatted_message() {
        let task = SliceTask::new(0, Range::new(0, 0), || panic!("bad slice {}", 7));
        assert_eq!(task.run().unwrap_err().message, "bad slice 7");
    }

    #[test]
    fn test_parse_names() {
        let ka = Duration::from_secs(1);
        assert_eq!(StrategyKind::parse("single", 4, ka).unwrap(), StrategyKind::Direct);
        assert_eq!(StrategyKind::parse("Direct", 4, ka).unwrap(), StrategyKind::Direct);
        assert_eq!(
            StrategyKind::parse("fixed", 4, ka).unwrap(),
            StrategyKind::Bounded { threads: 4 }
        );
        assert_eq!(
            StrategyKind::parse("fixed(2)", 4, ka).unwrap(),
            StrategyKind::Bounded { threads: 2 }
        );
        assert_eq!(
            StrategyKind::parse("cached", 4, ka).unwrap(),
            StrategyKind::Elastic { keep_alive: ka }
        );
    }

    #[test]
    fn test_parse_rejects_bad_names() {
        let ka = Duration::from_secs(1);
        assert!(matches!(
            StrategyKind::parse("forkjoin", 4, ka),
            Err(StrategyError::UnknownStrategy(_))
        ));
        assert!(matches!(
            StrategyKind::parse("fixed(x)", 4, ka),
            Err(StrategyError::UnknownStrategy(_))
        ));
        assert!(matches!(
            StrategyKind::parse("fixed(0)", 4, ka),
            Err(StrategyError::ZeroThreads)
        ));
    }

    #[test]
    fn test_labels() {
        assert_eq!(StrategyKind::Direct.label(), "single");
        assert_eq!(StrategyKind::Bounded { threads: 8 }.label(), "fixed(8)");
        assert_eq!(
            StrategyKind::Elastic { keep_alive: DEFAULT_KEEP_ALIVE }.label(),
            "cached"
        );
    }

    #[test]
    fn test_built_label_matches_kind() {
        for kind in [
            StrategyKind::Direct,
            StrategyKind::Bounded { threads: 2 },
            StrategyKind::Elastic { keep_alive: DEFAULT_KEEP_ALIVE },
        ] {
            let strategy = kind.build().unwrap();
            assert_eq!(strategy.label(), kind.label());
            assert!(strategy.shutdown(DEFAULT_SHUTDOWN_TIMEOUT).is_clean());
        }
    }

    #[test]
    fn test_await_exits_times_out() {
        let (_tx, rx) = crossbeam_channel::unbounded();
        let live = AtomicUsize::new(2);
        let status = await_exits(&rx, &live, Duration::from_millis(20));
        assert_eq!(status, ShutdownStatus::TimedOut { remaining: 2 });
    }

    #[test]
    fn test_await_exits_completes() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let live = AtomicUsize::new(1);
        live.fetch_sub(1, Ordering::Release);
        tx.send(()).unwrap();
        assert_eq!(
            await_exits(&rx, &live, Duration::from_millis(20)),
            ShutdownStatus::Completed
        );
    }
}
