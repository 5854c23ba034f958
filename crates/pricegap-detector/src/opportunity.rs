//! Discrepancy result type.

use crate::config::ALERT_FLOOR_PERCENT;
use chrono::{DateTime, Utc};
use pricegap_core::{Price, SourceId, TrackedPair};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Two places, half away from zero. Shared by log lines and alert text.
pub fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A pair of sources whose quotes differ by at least the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscrepancyResult {
    /// Lower-named source of the pair.
    pub source_a: SourceId,
    pub source_b: SourceId,
    pub price_a: Price,
    pub price_b: Price,
    /// `|a - b| / ((a + b) / 2) * 100`.
    pub pct_difference: Decimal,
    /// Source quoting the lower price.
    pub buy_source: SourceId,
    pub sell_source: SourceId,
    pub buy_price: Price,
    pub sell_price: Price,
    pub detected_at: DateTime<Utc>,
}

impl DiscrepancyResult {
    /// Build a result, deciding buy and sell sides from the two quotes.
    pub fn new(
        source_a: SourceId,
        price_a: Price,
        source_b: SourceId,
        price_b: Price,
        pct_difference: Decimal,
        detected_at: DateTime<Utc>,
    ) -> Self {
        let (buy_source, buy_price, sell_source, sell_price) = if price_a > price_b {
            (source_b, price_b, source_a, price_a)
        } else {
            (source_a, price_a, source_b, price_b)
        };

        Self {
            source_a,
            source_b,
            price_a,
            price_b,
            pct_difference,
            buy_source,
            sell_source,
            buy_price,
            sell_price,
            detected_at,
        }
    }

    /// Whether the difference clears the fixed alert floor.
    pub fn is_alertable(&self) -> bool {
        self.pct_difference >= ALERT_FLOOR_PERCENT
    }

    /// Percentage rounded half away from zero to two places.
    pub fn pct_rounded(&self) -> Decimal {
        round_display(self.pct_difference)
    }

    /// Trade description without the pair prefix.
    pub fn summary(&self) -> String {
        format!(
            "Buy on {} (${:.2}) and sell on {} (${:.2}) - Potential profit: {:.2}%",
            self.buy_source,
            round_display(self.buy_price.inner()),
            self.sell_source,
            round_display(self.sell_price.inner()),
            self.pct_rounded()
        )
    }

    /// Alert text: "SYMBOL/BASE: Buy on ... - Potential profit: x.xx%".
    pub fn alert_message(&self, pair: &TrackedPair) -> String {
        format!("{}: {}", pair.display_name(), self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_sides_follow_price() {
        let result = DiscrepancyResult::new(
            SourceId::Binance,
            Price::new(dec!(102)),
            SourceId::Kraken,
            Price::new(dec!(100)),
            dec!(1.98),
            at(),
        );
        assert_eq!(result.buy_source, SourceId::Kraken);
        assert_eq!(result.buy_price, Price::new(dec!(100)));
        assert_eq!(result.sell_source, SourceId::Binance);
        assert_eq!(result.sell_price, Price::new(dec!(102)));
    }

    #[test]
    fn test_alert_floor_is_inclusive() {
        let at_floor = DiscrepancyResult::new(
            SourceId::Binance,
            Price::new(dec!(1)),
            SourceId::Kraken,
            Price::new(dec!(1)),
            dec!(1.0),
            at(),
        );
        assert!(at_floor.is_alertable());

        let below = DiscrepancyResult {
            pct_difference: dec!(0.99),
            ..at_floor
        };
        assert!(!below.is_alertable());
    }

    #[test]
    fn test_round_display_is_half_away_from_zero() {
        // Already two places, so `{:.2}` only pads.
        assert_eq!(format!("{:.2}", round_display(dec!(1.005))), "1.01");
        assert_eq!(format!("{:.2}", round_display(dec!(1.015))), "1.02");
        assert_eq!(format!("{:.2}", round_display(dec!(3))), "3.00");
    }

    #[test]
    fn test_alert_message_format() {
        let pair = TrackedPair::new("xrp", "usdt", dec!(1)).unwrap();
        let result = DiscrepancyResult::new(
            SourceId::Binance,
            Price::new(dec!(0.5300)),
            SourceId::CoinGecko,
            Price::new(dec!(0.5410)),
            dec!(2.054154995331465919701213819),
            at(),
        );
        assert_eq!(
            result.alert_message(&pair),
            "XRP/USDT: Buy on Binance ($0.53) and sell on CoinGecko ($0.54) - Potential profit: 2.05%"
        );
    }

    #[test]
    fn test_pct_rounding_pads_and_rounds() {
        let mut result = DiscrepancyResult::new(
            SourceId::Binance,
            Price::new(dec!(100)),
            SourceId::Kraken,
            Price::new(dec!(103)),
            dec!(3),
            at(),
        );
        assert_eq!(
            result.summary(),
            "Buy on Binance ($100.00) and sell on Kraken ($103.00) - Potential profit: 3.00%"
        );
        assert_eq!(result.detected_at, at());

        result.pct_difference = dec!(1.005);
        assert_eq!(result.pct_rounded(), dec!(1.01));

        result.buy_price = Price::new(dec!(0.125));
        assert!(result.summary().contains("Buy on Binance ($0.13)"));
    }
}
