//! Veita Common - Shared types and utilities
//!
//! This crate provides the foundational types used across all Veita
//! components:
//! - Error types and error codes
//! - Fleet-wide constants (liveness window, saturation threshold)
//! - Validation and time utilities

pub mod error;
pub mod utils;

// Re-exports for convenience
pub use error::{ErrorCode, VeitaError};
pub use utils::{is_valid_uptime, now_secs, now_unix};

/// Seconds a heartbeat may age before a node is considered down (12 minutes)
pub const HEARTBEAT_TTL_SECS: i64 = 720;

/// CPU percentage at which a node is treated as saturated
pub const CPU_SATURATION_PCT: f64 = 75.0;

/// Fixed penalty score assigned to saturated nodes
pub const SATURATED_SCORE: i64 = 100;

/// Default number of nodes returned by best-n selection
pub const DEFAULT_BEST_COUNT: usize = 3;

/// Uptime string assigned to freshly registered nodes
pub const DEFAULT_UPTIME: &str = "0d 0h";

/// Header carrying a node's API key on telemetry reports
pub const API_KEY_HEADER: &str = "X-Api-Key";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liveness_constants() {
        assert_eq!(HEARTBEAT_TTL_SECS, 12 * 60);
        assert_eq!(SATURATED_SCORE, 100);
        assert_eq!(CPU_SATURATION_PCT, 75.0);
    }

    #[test]
    fn test_default_best_count() {
        assert_eq!(DEFAULT_BEST_COUNT, 3);
    }
}
