//! Discrepancy engine.
//!
//! Every unordered pair of available sources is compared exactly once,
//! ordered by source name, using `|a - b| / ((a + b) / 2) * 100` so that the
//! metric does not depend on argument order.

use crate::config::DetectorConfig;
use crate::error::{DetectorError, DetectorResult};
use crate::opportunity::{round_display, DiscrepancyResult};
use chrono::{DateTime, Utc};
use pricegap_core::{Price, PriceSnapshot, SourceId, TrackedPair};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const TWO: Decimal = Decimal::TWO;

/// Percentage difference relative to the average of the two prices.
///
/// Returns `Ok(None)` when the average is zero and `Err` on overflow.
pub fn pct_difference(a: Price, b: Price) -> DetectorResult<Option<Decimal>> {
    let overflow = || DetectorError::Overflow(format!("pct_difference({a}, {b})"));

    let diff = a.checked_abs_diff(b).ok_or_else(overflow)?;
    let sum = a.checked_add(b).ok_or_else(overflow)?;
    let avg = sum.inner().checked_div(TWO).ok_or_else(overflow)?;
    if avg.is_zero() {
        return Ok(None);
    }

    let pct = diff
        .checked_div(avg)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .ok_or_else(overflow)?;
    Ok(Some(pct))
}

/// Result of evaluating one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionOutcome {
    /// Fewer than two sources had a price; nothing was compared.
    InsufficientData { available: usize },
    /// Pairs were compared.
    Compared {
        /// Pairs whose difference could be computed.
        comparisons: usize,
        /// Pairs at or above the threshold, in comparison order.
        opportunities: Vec<DiscrepancyResult>,
    },
}

impl DetectionOutcome {
    pub fn comparisons(&self) -> usize {
        match self {
            Self::InsufficientData { .. } => 0,
            Self::Compared { comparisons, .. } => *comparisons,
        }
    }

    pub fn opportunities(&self) -> &[DiscrepancyResult] {
        match self {
            Self::InsufficientData { .. } => &[],
            Self::Compared { opportunities, .. } => opportunities,
        }
    }

    /// Opportunities that clear the fixed alert floor.
    pub fn alertable(&self) -> impl Iterator<Item = &DiscrepancyResult> {
        self.opportunities().iter().filter(|o| o.is_alertable())
    }
}

/// Discrepancy engine.
pub struct DiscrepancyEngine {
    config: DetectorConfig,
}

impl DiscrepancyEngine {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Compare all available quotes in `snapshot`, stamping opportunities
    /// with `detected_at`.
    ///
    /// Logs the current prices, one difference line per compared pair and a
    /// warning per opportunity.
    pub fn evaluate(
        &self,
        pair: &TrackedPair,
        snapshot: &PriceSnapshot,
        detected_at: DateTime<Utc>,
    ) -> DetectorResult<DetectionOutcome> {
        let mut available = snapshot.available();
        if available.len() < 2 {
            warn!(
                pair = %pair,
                available = available.len(),
                "Could not fetch prices from at least two sources"
            );
            return Ok(DetectionOutcome::InsufficientData {
                available: available.len(),
            });
        }

        info!(pair = %pair, prices = %format_prices(&available), "Current prices");

        available.sort_by(|(a, _), (b, _)| a.name().cmp(b.name()));

        let mut comparisons = 0;
        let mut opportunities = Vec::new();

        for (i, &(source_a, price_a)) in available.iter().enumerate() {
            for &(source_b, price_b) in &available[i + 1..] {
                let Some(pct) = pct_difference(price_a, price_b)? else {
                    debug!(
                        source_a = %source_a,
                        source_b = %source_b,
                        "Both prices zero, skipping pair"
                    );
                    continue;
                };
                comparisons += 1;

                let shown = round_display(pct);
                info!(
                    source_a = %source_a,
                    source_b = %source_b,
                    pct_difference = %shown,
                    "Price difference between {source_a} and {source_b}: {shown:.2}%"
                );

                if pct >= self.config.threshold_percent {
                    let result = DiscrepancyResult::new(
                        source_a,
                        price_a,
                        source_b,
                        price_b,
                        pct,
                        detected_at,
                    );
                    warn!(
                        pair = %pair,
                        buy = %result.buy_source,
                        sell = %result.sell_source,
                        pct_difference = %result.pct_rounded(),
                        alertable = result.is_alertable(),
                        "ARBITRAGE OPPORTUNITY: {}",
                        result.summary()
                    );
                    opportunities.push(result);
                }
            }
        }

        Ok(DetectionOutcome::Compared {
            comparisons,
            opportunities,
        })
    }
}

fn format_prices(available: &[(SourceId, Price)]) -> String {
    available
        .iter()
        .map(|(source, price)| format!("{source}: {price}"))
        .collect::<Vec<_>>()
        .join(", ")
}
