#![warn(missing_docs)]
//! # FluxStat
//!
//! Concurrent array statistics: one reduction, three ways to run it.
//!
//! An input array is split into `k` contiguous slices. Each slice is reduced
//! to an [`Accumulator`] (count, sum, sum of squares, min, max) and the
//! partials are merged into min, max, mean and population standard deviation.
//! The same work runs under each execution strategy so their wall-clock cost
//! can be compared:
//! - **single**: sequential on the calling thread
//! - **fixed(N)**: a rayon pool of `N` threads
//! - **cached**: threads created on demand, reused while idle, retired after a keep-alive
//!
//! A panicking slice contributes nothing and is recorded in the result; pool
//! teardown waits up to a deadline and reports whether every worker exited.
//!
//! ## Quick Start
//!
//! ```no_run
//! use fluxstat::prelude::*;
//! use std::sync::Arc;
//!
//! let data: Arc<[f64]> = (0..1_000_000).map(|i| f64::from(i % 1000)).collect();
//! let coordinator = Coordinator::new(RunConfig::default());
//!
//! let result = coordinator
//!     .run_strategy(&data, &StrategyKind::Bounded { threads: 4 })
//!     .unwrap();
//! println!("{}: mean {:.2} in {:.2} ms", result.label, result.mean, result.elapsed_ms);
//! ```

// Re-export statistics
pub use fluxstat_stats::{
    Accumulator, PartitionError, Range, SummaryStatistics, compute_slice, compute_summary,
    merge_all, partition,
};

// Re-export execution strategies
pub use fluxstat_core::{
    BoundedPool, DEFAULT_KEEP_ALIVE, DEFAULT_SHUTDOWN_TIMEOUT, Direct, ElasticPool,
    ExecutionStrategy, ShutdownStatus, SliceFailure, SliceOutcome, SliceTask, StrategyError,
    StrategyKind, Timer, available_cores,
};

// Re-export coordination and reporting
pub use fluxstat_cli::{
    Coordinator, CoordinatorError, RunConfig, SliceFn, StatConfig, build_report,
    format_human_output, generate_data, run_report,
};
pub use fluxstat_report::{
    OutputFormat, Report, ReportConfig, RunResult, RunStatus, generate_csv_report,
    generate_json_report,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Accumulator, Coordinator, ExecutionStrategy, Range, RunConfig, RunResult, ShutdownStatus,
        StrategyKind, compute_slice, compute_summary, partition,
    };
}

/// Run the FluxStat CLI.
///
/// ```ignore
/// fn main() {
///     fluxstat::run().unwrap();
/// }
/// ```
pub use fluxstat_cli::run;
