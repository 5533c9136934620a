//! Strategy Execution
//!
//! Runs strategies over the input and turns their results into a report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Arc<[f64]> + [StrategyKind]
//!       │
//!       ▼
//! ┌─────────────┐
//! │ coordinator │  Partition, dispatch, merge, time
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Comparison, summary, metadata
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`coordinator`] - Run coordination and the measured window
//! - [`report`] - Report building
//! - [`formatting`] - Human-readable output formatting
//! - [`metadata`] - System metadata collection

mod coordinator;
mod formatting;
mod metadata;
mod report;

// Re-export public API
pub use coordinator::{Coordinator, CoordinatorError, RunConfig, SliceFn, absorb_failures};
pub use formatting::format_human_output;
pub use metadata::build_report_meta;
pub use report::build_report;
