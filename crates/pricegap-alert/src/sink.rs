//! Notification sink contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pricegap_core::TrackedPair;
use serde::Serialize;

use crate::error::SinkResult;

/// What every sink receives for one dispatched alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertNotice {
    pub symbol: String,
    pub base_currency: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl AlertNotice {
    pub fn new(pair: &TrackedPair, message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            symbol: pair.symbol.clone(),
            base_currency: pair.base_currency.clone(),
            message: message.into(),
            timestamp,
        }
    }

    /// "SYMBOL/BASE".
    pub fn pair_label(&self) -> String {
        format!("{}/{}", self.symbol, self.base_currency)
    }

    /// Human timestamp used in message bodies.
    pub fn display_time(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }
}

/// A delivery channel for alerts.
///
/// Errors are returned to the dispatcher, which logs them and carries on
/// with the remaining sinks.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Short name for logs ("email", "sms", "webhook").
    fn name(&self) -> &'static str;

    async fn send(&self, notice: &AlertNotice) -> SinkResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_notice_from_pair() {
        let pair = TrackedPair::new("eth", "usd", dec!(1)).unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let notice = AlertNotice::new(&pair, "ETH/USD: Buy on Kraken", ts);

        assert_eq!(notice.symbol, "ETH");
        assert_eq!(notice.pair_label(), "ETH/USD");
        assert_eq!(notice.display_time(), "2024-03-09 14:05:07 UTC");
    }
}
