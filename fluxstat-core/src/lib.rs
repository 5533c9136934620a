#![warn(missing_docs)]
//! FluxStat Core - Execution Strategies
//!
//! This crate runs batches of independent slice computations:
//! - `ExecutionStrategy` trait: submit all tasks, block until all finish
//! - `Direct`: sequential baseline on the calling thread
//! - `BoundedPool`: fixed-size rayon pool
//! - `ElasticPool`: on-demand threads with idle reuse and keep-alive
//! - `Timer` for the per-run measurement window
//!
//! Panicking tasks are caught and reported per slice; pool teardown waits
//! for workers up to a deadline and reports whether it finished in time.

mod bounded;
mod direct;
mod elastic;
mod measure;
mod strategy;

pub use bounded::BoundedPool;
pub use direct::Direct;
pub use elastic::ElasticPool;
pub use measure::{Timer, duration_ms, parse_duration};
pub use strategy::{
    DEFAULT_KEEP_ALIVE, DEFAULT_SHUTDOWN_TIMEOUT, ExecutionStrategy, ShutdownStatus, SliceFailure,
    SliceJob, SliceOutcome, SliceTask, StrategyError, StrategyKind, available_cores,
};
