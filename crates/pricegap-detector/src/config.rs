//! Detector configuration.

use crate::error::{DetectorError, DetectorResult};
use pricegap_core::TrackedPair;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opportunities must also reach this percentage before they are forwarded
/// to the alert throttle, whatever the configured threshold.
pub const ALERT_FLOOR_PERCENT: Decimal = Decimal::ONE;

/// Configuration for discrepancy detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum percentage difference reported as an opportunity (inclusive).
    #[serde(default = "default_threshold_percent")]
    pub threshold_percent: Decimal,
}

fn default_threshold_percent() -> Decimal {
    Decimal::ONE
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold_percent: default_threshold_percent(),
        }
    }
}

impl DetectorConfig {
    pub fn for_pair(pair: &TrackedPair) -> Self {
        Self {
            threshold_percent: pair.threshold_percent,
        }
    }

    /// Validate configuration values.
    ///
    /// Returns Err if the threshold is zero or negative.
    pub fn validate(&self) -> DetectorResult<()> {
        if self.threshold_percent <= Decimal::ZERO {
            return Err(DetectorError::ConfigError(format!(
                "threshold_percent ({}) must be positive",
                self.threshold_percent
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert_eq!(config.threshold_percent, dec!(1));
        assert!(config.validate().is_ok());
        assert_eq!(ALERT_FLOOR_PERCENT, dec!(1.0));
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        let config = DetectorConfig {
            threshold_percent: dec!(0),
        };
        assert!(config.validate().is_err());

        let config = DetectorConfig {
            threshold_percent: dec!(-0.5),
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DetectorError::ConfigError(_)));
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn test_for_pair() {
        let pair = TrackedPair::new("XRP", "USDT", dec!(0.5)).unwrap();
        assert_eq!(DetectorConfig::for_pair(&pair).threshold_percent, dec!(0.5));
    }
}
