//! CSV Output
//!
//! One row per run, suitable for spreadsheets and plotting scripts.

use crate::report::Report;

const HEADER: &str =
    "label,tasks,count,min,max,mean,variance,std_dev,elapsed_ms,speedup,failed_slices,shutdown";

/// Generate a CSV report with one row per strategy run
pub fn generate_csv_report(report: &Report) -> String {
    let mut output = String::from(HEADER);
    output.push('\n');

    for (i, r) in report.results.iter().enumerate() {
        let speedup = report
            .comparison
            .as_ref()
            .and_then(|c| c.entries.get(i))
            .map(|e| e.speedup)
            .unwrap_or(1.0);

        output.push_str(&format!(
            "{},{},{},{},{},{},{},{},{:.3},{:.3},{},{}\n",
            escape(&r.label),
            r.tasks,
            r.count,
            r.min,
            r.max,
            r.mean,
            r.variance,
            r.std_dev,
            r.elapsed_ms,
            speedup,
            r.failed_slices(),
            escape(&r.shutdown.to_string()),
        ));
    }

    output
}

/// Quote a field if it contains a delimiter, quote or space
fn escape(field: &str) -> String {
    if field.contains([',', '"', ' ', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("fixed(8)"), "fixed(8)");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(
            escape("timed out (2 worker(s) still running)"),
            "\"timed out (2 worker(s) still running)\""
        );
    }
}
