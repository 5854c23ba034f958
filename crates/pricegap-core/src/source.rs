//! Price source identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// A venue we read quotes from.
///
/// Each variant selects its own normalization, request and extraction
/// strategy downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    /// Direct-pair venue ("ETHUSDT").
    Binance,
    /// Composite-asset venue ("XXBTZUSD" with exceptions).
    Kraken,
    /// Aggregator keyed by coin slug ("bitcoin" / "usd").
    CoinGecko,
}

impl SourceId {
    /// Fixed fetch order used by the polling loop.
    pub const ALL: [SourceId; 3] = [SourceId::Binance, SourceId::Kraken, SourceId::CoinGecko];

    /// Human-readable name used in logs, alerts and comparison ordering.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Binance => "Binance",
            Self::Kraken => "Kraken",
            Self::CoinGecko => "CoinGecko",
        }
    }

    /// Lowercase key used in configuration and metrics labels.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Binance => "binance",
            Self::Kraken => "kraken",
            Self::CoinGecko => "coingecko",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SourceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binance" => Ok(Self::Binance),
            "kraken" => Ok(Self::Kraken),
            "coingecko" => Ok(Self::CoinGecko),
            other => Err(CoreError::UnknownSource(other.to_string())),
        }
    }
}
