//! Wall-clock Timing
//!
//! Monotonic timer used to bracket each strategy run. Every strategy is timed
//! through the same [`Timer`], so the measured window is identical across
//! strategies.

use std::time::{Duration, Instant};

/// Timer for measuring one run
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time since start
    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return elapsed milliseconds (fractional)
    #[inline(always)]
    pub fn stop_ms(&self) -> f64 {
        duration_ms(self.elapsed())
    }
}

/// Convert a duration to fractional milliseconds
pub fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Parse a duration string (e.g. "10s", "500ms", "2m") into a `Duration`.
///
/// A bare number is read as seconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Empty duration string".to_string());
    }

    // Find where the number ends and unit begins
    let (num_part, unit_part) = s
        .char_indices()
        .find(|(_, c)| c.is_alphabetic() || *c == 'µ')
        .map(|(i, _)| s.split_at(i))
        .unwrap_or((s, "s"));

    let value: f64 = num_part
        .trim()
        .parse()
        .map_err(|_| format!("Invalid duration number: {num_part}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("Duration must be a non-negative number: {num_part}"));
    }

    let nanos_per_unit: f64 = match unit_part.to_lowercase().as_str() {
        "ns" => 1.0,
        "us" | "µs" => 1_000.0,
        "ms" => 1_000_000.0,
        "s" | "" => 1_000_000_000.0,
        "m" | "min" => 60_000_000_000.0,
        _ => return Err(format!("Unknown duration unit: {unit_part}")),
    };

    Ok(Duration::from_nanos((value * nanos_per_unit) as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_elapsed() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(10));
        let ms = timer.stop_ms();

        // Should be at least ~10ms, allowing for coarse sleeps
        assert!(ms >= 5.0);
        assert!(ms < 5_000.0);
    }

    #[test]
    fn test_duration_ms() {
        assert_eq!(duration_ms(Duration::from_micros(1500)), 1.5);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("100us").unwrap(), Duration::from_micros(100));
        assert_eq!(parse_duration("1000ns").unwrap(), Duration::from_nanos(1000));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_duration("10").unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn test_parse_duration_errors() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("fast").is_err());
        assert!(parse_duration("5h").is_err());
        assert!(parse_duration("-1s").is_err());
    }
}
