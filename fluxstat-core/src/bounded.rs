//! Bounded Pool
//!
//! A fixed number of reusable rayon worker threads. All tasks of a batch are
//! spawned into one `scope`, which returns only once every task has finished.
//! Each task writes its outcome into its own slot, so no locking is needed to
//! collect results.

use crate::strategy::{ExecutionStrategy, ShutdownStatus, SliceOutcome, SliceTask, StrategyError};
use crossbeam_channel::Receiver;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Fixed-size worker pool backed by a dedicated rayon `ThreadPool`
pub struct BoundedPool {
    pool: ThreadPool,
    threads: usize,
    live: Arc<AtomicUsize>,
    exits: Receiver<()>,
}

impl BoundedPool {
    /// Build a pool with exactly `threads` workers
    pub fn new(threads: usize) -> Result<Self, StrategyError> {
        if threads == 0 {
            return Err(StrategyError::ZeroThreads);
        }

        let live = Arc::new(AtomicUsize::new(threads));
        let (exit_tx, exits) = crossbeam_channel::unbounded();
        let exit_live = Arc::clone(&live);

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("fluxstat-fixed-{i}"))
            .exit_handler(move |_| {
                exit_live.fetch_sub(1, Ordering::AcqRel);
                let _ = exit_tx.send(());
            })
            .build()?;

        Ok(Self {
            pool,
            threads,
            live,
            exits,
        })
    }
}

impl ExecutionStrategy for BoundedPool {
    fn label(&self) -> String {
        format!("fixed({})", self.threads)
    }

    fn run(&self, tasks: Vec<SliceTask>) -> Vec<SliceOutcome> {
        let mut outcomes: Vec<SliceOutcome> = tasks
            .iter()
            .map(|t| Err(t.not_run("task did not report a result")))
            .collect();

        self.pool.scope(|s| {
            for (slot, task) in outcomes.iter_mut().zip(tasks) {
                s.spawn(move |_| *slot = task.run());
            }
        });

        outcomes
    }

    fn shutdown(self: Box<Self>, deadline: Duration) -> ShutdownStatus {
        let Self {
            pool, live, exits, ..
        } = *self;
        // Dropping the pool tells every worker to exit once idle
        drop(pool);
        crate::strategy::await_exits(&exits, &live, deadline)
    }
}
