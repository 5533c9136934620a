#![warn(missing_docs)]
//! FluxStat CLI Library
//!
//! This module provides the command line around the run coordinator:
//! configuration discovery, input generation, strategy selection, progress
//! display and report output. Use `fluxstat_cli::run()` in a main function
//! to get the full CLI.
//!
//! # Example
//!
//! ```ignore
//! fn main() {
//!     if let Err(e) = fluxstat_cli::run() {
//!         eprintln!("Error: {e}");
//!         std::process::exit(1);
//!     }
//! }
//! ```

mod config;
mod data;
mod executor;

pub use config::*;
pub use data::{DataError, generate_data};
pub use executor::{
    Coordinator, CoordinatorError, RunConfig, SliceFn, absorb_failures, build_report,
    build_report_meta, format_human_output,
};

use clap::{Parser, Subcommand};
use fluxstat_core::{StrategyKind, duration_ms};
use fluxstat_report::{
    OutputFormat, Report, ReportConfig, generate_csv_report, generate_json_report,
};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// FluxStat CLI arguments
#[derive(Parser, Debug)]
#[command(name = "fluxstat")]
#[command(
    author,
    version,
    about = "FluxStat - parallel array statistics across execution strategies"
)]
pub struct Cli {
    /// Optional subcommand (Run, List, Init); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Select strategies whose label matches this regex
    #[arg(long, global = true)]
    pub filter: Option<String>,

    /// Output format: human, json, csv
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Configuration file (default: discover fluxstat.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of values to generate
    #[arg(long, global = true)]
    pub size: Option<usize>,

    /// Seed for the input generator
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Slice tasks per run
    #[arg(long, global = true)]
    pub tasks: Option<usize>,

    /// Fixed pool size
    #[arg(long, short = 'j', global = true)]
    pub threads: Option<usize>,

    /// Strategies to run, comma separated (single, fixed, fixed(N), cached)
    #[arg(long, value_delimiter = ',', global = true)]
    pub strategies: Option<Vec<String>>,

    /// Unreported rounds before each measured run
    #[arg(long, global = true)]
    pub warmup_rounds: Option<u32>,

    /// Deadline for pool teardown (e.g., "10s", "500ms")
    #[arg(long, global = true)]
    pub shutdown_timeout: Option<String>,

    /// Idle lifetime of cached pool workers (e.g., "60s")
    #[arg(long, global = true)]
    pub keep_alive: Option<String>,

    /// Hide the progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the selected strategies (default)
    Run,
    /// List the strategies that would run
    List,
    /// Print a default fluxstat.toml
    Init,
}

/// Run the FluxStat CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the FluxStat CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    if let Some(Commands::Init) = cli.command {
        print!("{}", StatConfig::default_toml());
        return Ok(());
    }

    // fluxstat.toml first, CLI flags override
    let mut config = match &cli.config {
        Some(path) => StatConfig::load(path)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {e}", path.display()))?,
        None => StatConfig::discover().unwrap_or_default(),
    };
    apply_cli_overrides(&cli, &mut config);

    let filter = build_filter(cli.filter.as_deref())?;

    match cli.command {
        Some(Commands::List) => list_strategies(&config, filter.as_ref()),
        Some(Commands::Run) | None => {
            let report = run_report(&config, filter.as_ref(), !cli.no_progress)?;
            let format: OutputFormat = config.output.format.parse().map_err(anyhow::Error::msg)?;
            write_output(&render_report(&report, format)?, config.output.path.as_deref())?;

            if report.summary.has_degraded() {
                eprintln!(
                    "\n{} run(s) degraded: {} failed slice(s), {} shutdown timeout(s)",
                    report.summary.degraded,
                    report.summary.failed_slices,
                    report.summary.shutdown_timeouts
                );
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::Init) => Ok(()),
    }
}

/// Install the stderr `fmt` subscriber; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Layer CLI flags over file configuration
pub fn apply_cli_overrides(cli: &Cli, config: &mut StatConfig) {
    if let Some(size) = cli.size {
        config.workload.size = size;
    }
    if let Some(seed) = cli.seed {
        config.workload.seed = seed;
    }
    if let Some(tasks) = cli.tasks {
        config.runner.tasks = Some(tasks);
    }
    if let Some(threads) = cli.threads {
        config.runner.threads = Some(threads);
    }
    if let Some(ref strategies) = cli.strategies {
        config.runner.strategies = strategies.clone();
    }
    if let Some(rounds) = cli.warmup_rounds {
        config.runner.warmup_rounds = rounds;
    }
    if let Some(ref timeout) = cli.shutdown_timeout {
        config.runner.shutdown_timeout = timeout.clone();
    }
    if let Some(ref keep_alive) = cli.keep_alive {
        config.runner.keep_alive = keep_alive.clone();
    }
    if let Some(ref format) = cli.format {
        config.output.format = format.clone();
    }
    if let Some(ref path) = cli.output {
        config.output.path = Some(path.display().to_string());
    }
}

fn build_filter(pattern: Option<&str>) -> anyhow::Result<Option<Regex>> {
    pattern
        .map(|p| Regex::new(p).map_err(|e| anyhow::anyhow!("Invalid --filter pattern: {e}")))
        .transpose()
}

/// Configured strategies whose label matches `filter`, in configured order
pub fn select_strategies(
    config: &StatConfig,
    filter: Option<&Regex>,
) -> anyhow::Result<Vec<StrategyKind>> {
    let kinds = config.runner.strategy_kinds()?;
    Ok(kinds
        .into_iter()
        .filter(|kind| filter.is_none_or(|re| re.is_match(&kind.label())))
        .collect())
}

fn list_strategies(config: &StatConfig, filter: Option<&Regex>) -> anyhow::Result<()> {
    let kinds = select_strategies(config, filter)?;
    let workload = &config.workload;

    println!("FluxStat Plan:");
    println!(
        "├── workload: {} values in [{}, {}), seed {}",
        workload.size, workload.low, workload.high, workload.seed
    );
    println!(
        "├── tasks: {}  shutdown timeout: {}  warmup rounds: {}",
        config.runner.resolved_tasks(),
        config.runner.shutdown_timeout,
        config.runner.warmup_rounds
    );
    for kind in &kinds {
        println!("│   ├── {}", kind.label());
    }
    println!("{} strategies selected.", kinds.len());

    Ok(())
}

/// Generate the input, run every selected strategy and build the report.
///
/// Runs with failed slices or teardown timeouts are kept in the report;
/// callers decide what a degraded report means for them.
pub fn run_report(
    config: &StatConfig,
    filter: Option<&Regex>,
    show_progress: bool,
) -> anyhow::Result<Report> {
    let kinds = select_strategies(config, filter)?;
    let run_config = RunConfig {
        tasks: config.runner.resolved_tasks(),
        shutdown_timeout: config.runner.shutdown_timeout()?,
        warmup_rounds: config.runner.warmup_rounds,
    };
    let workload = &config.workload;

    tracing::info!(
        strategies = kinds.len(),
        size = workload.size,
        tasks = run_config.tasks,
        "starting runs"
    );

    let start_time = Instant::now();
    let data = generate_data(workload.size, workload.seed, workload.low, workload.high)?;
    let coordinator = Coordinator::new(run_config.clone());

    let pb = if show_progress {
        ProgressBar::new(kinds.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut results = Vec::with_capacity(kinds.len());
    for kind in &kinds {
        pb.set_message(kind.label());
        results.push(coordinator.run_strategy(&data, kind)?);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let total_duration_ms = duration_ms(start_time.elapsed());
    let report_config = ReportConfig {
        size: workload.size,
        tasks: run_config.tasks,
        seed: workload.seed,
        warmup_rounds: run_config.warmup_rounds,
        shutdown_timeout_ms: duration_ms(run_config.shutdown_timeout),
    };

    Ok(build_report(results, report_config, total_duration_ms))
}

/// Render a report in the requested format
pub fn render_report(report: &Report, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Csv => generate_csv_report(report),
        OutputFormat::Human => format_human_output(report),
    })
}

fn write_output(output: &str, path: Option<&str>) -> anyhow::Result<()> {
    if let Some(path) = path {
        let mut file = std::fs::File::create(path)?;
        file.write_all(output.as_bytes())?;
        eprintln!("Report written to: {path}");
    } else {
        print!("{}", output);
    }
    Ok(())
}
