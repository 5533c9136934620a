//! Elastic Pool
//!
//! Creates worker threads on demand with no fixed cap and reuses idle ones.
//! Idle workers retire after `keep_alive` without work.
//!
//! ## Hand-off
//!
//! `idle` counts waiting workers that no submitter has claimed yet. A
//! submitter either claims one (decrement, then send the job on the shared
//! queue) or spawns a new thread that starts with the job in hand. A worker
//! whose keep-alive expires retires only if it can still decrement `idle`;
//! otherwise a claimed job is already on its way and it takes that first.
//!
//! ```text
//! submit(job) ──┬── idle > 0 ──▶ jobs queue ──▶ waiting worker
//!               └── idle = 0 ──▶ spawn worker(job)
//! ```

use crate::strategy::{
    ExecutionStrategy, ShutdownStatus, SliceFailure, SliceOutcome, SliceTask, await_exits,
};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Counters shared between the pool handle and its workers
struct Shared {
    idle: AtomicUsize,
    live: AtomicUsize,
    exits: Sender<()>,
}

impl Shared {
    /// Claim one unclaimed idle worker, if any
    fn claim_idle(&self) -> bool {
        self.idle
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }
}

/// Signals worker exit even if the worker unwinds
struct ExitGuard(Arc<Shared>);

impl Drop for ExitGuard {
    fn drop(&mut self) {
        self.0.live.fetch_sub(1, Ordering::AcqRel);
        let _ = self.0.exits.send(());
    }
}

/// Cached thread pool: grows on demand, reuses idle threads
pub struct ElasticPool {
    jobs: Sender<Job>,
    queue: Receiver<Job>,
    shared: Arc<Shared>,
    exits: Receiver<()>,
    spawned: AtomicUsize,
    keep_alive: Duration,
}

impl ElasticPool {
    /// Create an empty pool; threads appear as work is submitted
    pub fn new(keep_alive: Duration) -> Self {
        let (jobs, queue) = crossbeam_channel::unbounded();
        let (exit_tx, exits) = crossbeam_channel::unbounded();
        Self {
            jobs,
            queue,
            shared: Arc::new(Shared {
                idle: AtomicUsize::new(0),
                live: AtomicUsize::new(0),
                exits: exit_tx,
            }),
            exits,
            spawned: AtomicUsize::new(0),
            keep_alive,
        }
    }

    /// Total threads created over the pool's lifetime
    pub fn threads_spawned(&self) -> usize {
        self.spawned.load(Ordering::Relaxed)
    }

    /// Threads currently alive (busy or idle)
    pub fn live_threads(&self) -> usize {
        self.shared.live.load(Ordering::Acquire)
    }

    /// Submit a job to an idle worker or a freshly spawned one
    fn execute(&self, job: Job) -> std::io::Result<()> {
        if self.shared.claim_idle() {
            return self
                .jobs
                .send(job)
                .map_err(|_| std::io::Error::other("job queue closed"));
        }
        self.spawn_worker(job)
    }

    fn spawn_worker(&self, first: Job) -> std::io::Result<()> {
        let id = self.spawned.fetch_add(1, Ordering::Relaxed);
        let queue = self.queue.clone();
        let shared = Arc::clone(&self.shared);
        let keep_alive = self.keep_alive;

        self.shared.live.fetch_add(1, Ordering::AcqRel);
        let spawned = std::thread::Builder::new()
            .name(format!("fluxstat-cached-{id}"))
            .spawn(move || worker_loop(first, queue, shared, keep_alive));

        match spawned {
            Ok(_handle) => {
                tracing::trace!(worker = id, "spawned elastic worker");
                Ok(())
            }
            Err(e) => {
                self.shared.live.fetch_sub(1, Ordering::AcqRel);
                Err(e)
            }
        }
    }
}

fn worker_loop(first: Job, queue: Receiver<Job>, shared: Arc<Shared>, keep_alive: Duration) {
    let _guard = ExitGuard(Arc::clone(&shared));
    first();

    loop {
        shared.idle.fetch_add(1, Ordering::AcqRel);
        match queue.recv_timeout(keep_alive) {
            // The submitter already claimed us by decrementing `idle`
            Ok(job) => job(),
            Err(RecvTimeoutError::Timeout) => {
                if shared.claim_idle() {
                    break;
                }
                match queue.recv() {
                    Ok(job) => job(),
                    Err(_) => break,
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

impl ExecutionStrategy for ElasticPool {
    fn label(&self) -> String {
        "cached".to_string()
    }

    fn run(&self, tasks: Vec<SliceTask>) -> Vec<SliceOutcome> {
        let mut outcomes: Vec<SliceOutcome> = tasks
            .iter()
            .map(|t| Err(t.not_run("task did not report a result")))
            .collect();

        let (results_tx, results_rx) = crossbeam_channel::bounded(tasks.len());
        let mut dispatched = 0usize;

        for (slot, task) in tasks.into_iter().enumerate() {
            let (index, range) = (task.index(), task.range());
            let tx = results_tx.clone();
            let job: Job = Box::new(move || {
                let _ = tx.send((slot, task.run()));
            });

            match self.execute(job) {
                Ok(()) => dispatched += 1,
                Err(e) => {
                    tracing::warn!(slot, error = %e, "could not dispatch slice task");
                    outcomes[slot] = Err(SliceFailure {
                        index,
                        range,
                        message: format!("failed to spawn worker thread: {e}"),
                    });
                }
            }
        }
        drop(results_tx);

        for _ in 0..dispatched {
            match results_rx.recv() {
                Ok((slot, outcome)) => outcomes[slot] = outcome,
                Err(_) => break,
            }
        }

        outcomes
    }

    fn shutdown(self: Box<Self>, deadline: Duration) -> ShutdownStatus {
        let Self {
            jobs,
            queue,
            shared,
            exits,
            ..
        } = *self;
        // Closing the queue wakes every idle worker with `Disconnected`
        drop(jobs);
        drop(queue);
        await_exits(&exits, &shared.live, deadline)
    }
}
