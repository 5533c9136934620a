//! Direct execution: every task runs in order on the calling thread.
//!
//! The sequential baseline that pool strategies are compared against.

use crate::strategy::{ExecutionStrategy, ShutdownStatus, SliceOutcome, SliceTask};
use std::time::Duration;

/// Sequential strategy with no worker threads
#[derive(Debug, Clone, Copy, Default)]
pub struct Direct;

impl ExecutionStrategy for Direct {
    fn label(&self) -> String {
        "single".to_string()
    }

    fn run(&self, tasks: Vec<SliceTask>) -> Vec<SliceOutcome> {
        tasks.into_iter().map(SliceTask::run).collect()
    }

    fn shutdown(self: Box<Self>, _deadline: Duration) -> ShutdownStatus {
        ShutdownStatus::Completed
    }
}
