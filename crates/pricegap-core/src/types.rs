//! Per-run and per-cycle observation types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CoreError, Price, SourceId};

/// The pair being monitored for one run, with its opportunity threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedPair {
    /// Asset symbol, uppercase (e.g. "XRP").
    pub symbol: String,
    /// Quote currency, uppercase (e.g. "USDT").
    pub base_currency: String,
    /// Minimum percentage difference reported as an opportunity.
    pub threshold_percent: Decimal,
}

impl TrackedPair {
    /// Build a pair, uppercasing both legs.
    ///
    /// Rejects empty legs and non-positive thresholds.
    pub fn new(
        symbol: impl AsRef<str>,
        base_currency: impl AsRef<str>,
        threshold_percent: Decimal,
    ) -> crate::Result<Self> {
        let symbol = symbol.as_ref().trim().to_ascii_uppercase();
        let base_currency = base_currency.as_ref().trim().to_ascii_uppercase();
        if symbol.is_empty() || base_currency.is_empty() {
            return Err(CoreError::InvalidPair(format!(
                "symbol and base currency must be non-empty (got '{symbol}/{base_currency}')"
            )));
        }
        if threshold_percent <= Decimal::ZERO {
            return Err(CoreError::InvalidPair(format!(
                "threshold must be positive, got {threshold_percent}"
            )));
        }
        Ok(Self {
            symbol,
            base_currency,
            threshold_percent,
        })
    }

    /// Display form "SYMBOL/BASE".
    pub fn display_name(&self) -> String {
        format!("{}/{}", self.symbol, self.base_currency)
    }
}

impl fmt::Display for TrackedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.symbol, self.base_currency)
    }
}

/// One source's quote for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub source: SourceId,
    /// `None` when the source could not supply a value.
    pub price: Option<Price>,
    pub fetched_at: DateTime<Utc>,
}

impl PricePoint {
    pub fn new(source: SourceId, price: Option<Price>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            source,
            price,
            fetched_at,
        }
    }

    /// Point for a source that produced nothing this cycle.
    pub fn missing(source: SourceId, fetched_at: DateTime<Utc>) -> Self {
        Self::new(source, None, fetched_at)
    }
}

/// Ordered source → quote mapping for one cycle.
///
/// Insertion order is preserved, one entry per source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    points: Vec<PricePoint>,
}

impl PriceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a point, replacing any earlier point for the same source in place.
    pub fn insert(&mut self, point: PricePoint) {
        match self.points.iter_mut().find(|p| p.source == point.source) {
            Some(existing) => *existing = point,
            None => self.points.push(point),
        }
    }

    pub fn get(&self, source: SourceId) -> Option<&PricePoint> {
        self.points.iter().find(|p| p.source == source)
    }

    /// Quote for a source, `None` if absent or missing.
    pub fn price(&self, source: SourceId) -> Option<Price> {
        self.get(source).and_then(|p| p.price)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }

    /// Sources with a value, in insertion order.
    pub fn available(&self) -> Vec<(SourceId, Price)> {
        self.points
            .iter()
            .filter_map(|p| p.price.map(|price| (p.source, price)))
            .collect()
    }

    pub fn available_count(&self) -> usize {
        self.points.iter().filter(|p| p.price.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<PricePoint> for PriceSnapshot {
    fn from_iter<I: IntoIterator<Item = PricePoint>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for point in iter {
            snapshot.insert(point);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn point(source: SourceId, price: Option<Decimal>) -> PricePoint {
        PricePoint::new(source, price.map(Price::new), Utc::now())
    }

    #[test]
    fn test_tracked_pair_uppercases() {
        let pair = TrackedPair::new("eth", " usdt ", dec!(1.5)).unwrap();
        assert_eq!(pair.symbol, "ETH");
        assert_eq!(pair.base_currency, "USDT");
        assert_eq!(pair.display_name(), "ETH/USDT");
        assert_eq!(pair.to_string(), "ETH/USDT");
    }

    #[test]
    fn test_tracked_pair_rejects_bad_input() {
        assert!(TrackedPair::new("", "USDT", dec!(1)).is_err());
        assert!(TrackedPair::new("XRP", "USDT", dec!(0)).is_err());
        assert!(TrackedPair::new("XRP", "USDT", dec!(-2)).is_err());
    }

    #[test]
    fn test_snapshot_preserves_order_and_missing() {
        let snapshot: PriceSnapshot = vec![
            point(SourceId::Binance, Some(dec!(100))),
            point(SourceId::Kraken, None),
            point(SourceId::CoinGecko, Some(dec!(102))),
        ]
        .into_iter()
        .collect();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.available_count(), 2);
        assert_eq!(
            snapshot.available(),
            vec![
                (SourceId::Binance, Price::new(dec!(100))),
                (SourceId::CoinGecko, Price::new(dec!(102))),
            ]
        );
        assert!(snapshot.get(SourceId::Kraken).is_some());
        assert_eq!(snapshot.price(SourceId::Kraken), None);
    }

    #[test]
    fn test_snapshot_insert_replaces_same_source() {
        let mut snapshot = PriceSnapshot::new();
        snapshot.insert(point(SourceId::Binance, None));
        snapshot.insert(point(SourceId::Kraken, Some(dec!(1))));
        snapshot.insert(point(SourceId::Binance, Some(dec!(2))));

        assert_eq!(snapshot.len(), 2);
        let order: Vec<_> = snapshot.iter().map(|p| p.source).collect();
        assert_eq!(order, vec![SourceId::Binance, SourceId::Kraken]);
        assert_eq!(snapshot.price(SourceId::Binance), Some(Price::new(dec!(2))));
    }
}
