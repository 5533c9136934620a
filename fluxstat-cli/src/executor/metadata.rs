//! System Metadata Collection
//!
//! Collects system information for report metadata.
//!
//! ## Collected Data
//!
//! - **OS**: Operating system name and architecture
//! - **CPU**: Model name and core count
//! - **Timestamp**: UTC time of report generation
//!
//! The CPU model is read from `/proc/cpuinfo` and falls back to "Unknown" on
//! other platforms.

use chrono::Utc;
use fluxstat_core::available_cores;
use fluxstat_report::{ReportConfig, ReportMeta, SCHEMA_VERSION, SystemInfo};

/// Build report metadata for a run with the given workload
pub fn build_report_meta(config: ReportConfig) -> ReportMeta {
    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: get_cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores: u32::try_from(available_cores()).unwrap_or(u32::MAX),
    };

    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        system,
        config,
    }
}

/// Get CPU model name from /proc/cpuinfo (Linux only)
fn get_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}
