//! Configuration loading from fluxstat.toml
//!
//! FluxStat configuration can be specified in a `fluxstat.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use fluxstat_core::{StrategyKind, available_cores, parse_duration};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Name of the configuration file looked up by [`StatConfig::discover`]
pub const CONFIG_FILE: &str = "fluxstat.toml";

/// FluxStat configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatConfig {
    /// Input generation
    #[serde(default)]
    pub workload: WorkloadConfig,
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Input array generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Number of values to generate
    #[serde(default = "default_size")]
    pub size: usize,
    /// RNG seed
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Inclusive lower bound of generated values
    #[serde(default)]
    pub low: f64,
    /// Exclusive upper bound of generated values
    #[serde(default = "default_high")]
    pub high: f64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            seed: default_seed(),
            low: 0.0,
            high: default_high(),
        }
    }
}

fn default_size() -> usize {
    20_000_000
}
fn default_seed() -> u64 {
    42
}
fn default_high() -> f64 {
    1_000_000.0
}

/// Runner configuration for strategy execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Slice tasks per run (default: available parallelism)
    #[serde(default)]
    pub tasks: Option<usize>,
    /// Fixed pool size (default: number of tasks)
    #[serde(default)]
    pub threads: Option<usize>,
    /// Deadline for pool teardown (e.g., "10s")
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: String,
    /// Idle lifetime of cached pool workers (e.g., "60s")
    #[serde(default = "default_keep_alive")]
    pub keep_alive: String,
    /// Unreported rounds before each measured run
    #[serde(default)]
    pub warmup_rounds: u32,
    /// Strategies to run, in order
    #[serde(default = "default_strategies")]
    pub strategies: Vec<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tasks: None,
            threads: None,
            shutdown_timeout: default_shutdown_timeout(),
            keep_alive: default_keep_alive(),
            warmup_rounds: 0,
            strategies: default_strategies(),
        }
    }
}

fn default_shutdown_timeout() -> String {
    "10s".to_string()
}
fn default_keep_alive() -> String {
    "60s".to_string()
}
fn default_strategies() -> Vec<String> {
    vec!["single".into(), "fixed".into(), "cached".into()]
}

impl RunnerConfig {
    /// Task count, falling back to the number of cores
    pub fn resolved_tasks(&self) -> usize {
        self.tasks.unwrap_or_else(available_cores)
    }

    /// Teardown deadline
    pub fn shutdown_timeout(&self) -> anyhow::Result<Duration> {
        parse_duration(&self.shutdown_timeout)
            .map_err(|e| anyhow::anyhow!("runner.shutdown_timeout: {e}"))
    }

    /// Cached pool keep-alive
    pub fn keep_alive(&self) -> anyhow::Result<Duration> {
        parse_duration(&self.keep_alive).map_err(|e| anyhow::anyhow!("runner.keep_alive: {e}"))
    }

    /// Parse the configured strategy names
    ///
    /// Bare `fixed` uses `threads`, or the task count when unset.
    pub fn strategy_kinds(&self) -> anyhow::Result<Vec<StrategyKind>> {
        let threads = self.threads.unwrap_or_else(|| self.resolved_tasks());
        let keep_alive = self.keep_alive()?;
        self.strategies
            .iter()
            .map(|name| {
                StrategyKind::parse(name, threads, keep_alive).map_err(anyhow::Error::from)
            })
            .collect()
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Report file (stdout if unset)
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl StatConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => {
                        tracing::debug!(path = %config_path.display(), "loaded config");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %config_path.display(),
                            error = %e,
                            "ignoring unreadable config"
                        );
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# FluxStat Configuration

[workload]
# Number of values in the input array
size = 20000000
# Seed for the input generator
seed = 42
# Values are drawn uniformly from [low, high)
low = 0.0
high = 1000000.0

[runner]
# Slice tasks per run (uncomment to override available parallelism)
# tasks = 8
# Fixed pool size (uncomment to override; defaults to tasks)
# threads = 8
# Deadline for pool teardown
shutdown_timeout = "10s"
# Idle lifetime of cached pool workers
keep_alive = "60s"
# Unreported rounds before each measured run
warmup_rounds = 0
# Strategies to run: single, fixed, fixed(N), cached
strategies = ["single", "fixed", "cached"]

[output]
# Default output format: human, json, csv
format = "human"
# Report file (uncomment to write instead of stdout)
# path = "fluxstat-report.json"
"#
        .to_string()
    }
}
