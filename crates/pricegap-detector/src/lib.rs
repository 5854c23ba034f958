//! Cross-venue price discrepancy detection.
//!
//! Compares every pair of available quotes in a cycle using the symmetric
//! average-price percentage, reports opportunities at or above the configured
//! threshold and marks those at or above the fixed alert floor for the
//! alert throttle.

pub mod config;
pub mod detector;
pub mod error;
pub mod opportunity;

pub use config::{DetectorConfig, ALERT_FLOOR_PERCENT};
pub use detector::{pct_difference, DetectionOutcome, DiscrepancyEngine};
pub use error::{DetectorError, DetectorResult};
pub use opportunity::{round_display, DiscrepancyResult};
