//! JSON Output
//!
//! Non-finite floats (NaN mean of an empty input, infinite min/max
//! identities) serialize as `null`.

use crate::report::Report;

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Generate a prettified JSON report.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
