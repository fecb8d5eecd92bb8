//! Utility functions for Veita
//!
//! Validation and time helpers used across the codebase.

use std::sync::LazyLock;

use chrono::Utc;

/// Regex pattern for node uptime strings, e.g. "3d 4h" or "142d 23h"
static UPTIME_PATTERN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new("^[0-9]+d [0-9][0-9]?h$").expect("Invalid regex pattern"));

/// Validate an uptime string as reported by a node
///
/// Leading and trailing whitespace is ignored.
///
/// # Examples
///
/// ```
/// use veita_common::is_valid_uptime;
///
/// assert!(is_valid_uptime("3d 4h"));
/// assert!(is_valid_uptime("0d 0h"));
/// assert!(!is_valid_uptime("3 days"));
/// assert!(!is_valid_uptime("-1d 2h"));
/// ```
pub fn is_valid_uptime(s: &str) -> bool {
    UPTIME_PATTERN.is_match(s.trim())
}

/// Current Unix time as a fractional second count
///
/// Heartbeat setters floor this value; keeping the fractional read here makes
/// the truncation an explicit property of the node record.
pub fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Current Unix time in whole seconds
pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uptime_accepts_day_hour_pairs() {
        assert!(is_valid_uptime("0d 0h"));
        assert!(is_valid_uptime("3d 4h"));
        assert!(is_valid_uptime("142d 23h"));
        assert!(is_valid_uptime("  7d 12h  "));
    }

    #[test]
    fn test_uptime_rejects_other_shapes() {
        assert!(!is_valid_uptime("3 days"));
        assert!(!is_valid_uptime("4h"));
        assert!(!is_valid_uptime("-1d 2h"));
        assert!(!is_valid_uptime("3d"));
        assert!(!is_valid_uptime("3d 123h"));
        assert!(!is_valid_uptime(""));
        assert!(!is_valid_uptime("3d 4h uptime"));
    }

    #[test]
    fn test_now_secs_is_fractional_of_now_unix() {
        let whole = now_unix();
        let frac = now_secs();
        assert!((frac - whole as f64).abs() < 2.0);
    }
}
