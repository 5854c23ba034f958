//! Catalog of well-known pairs listed by `pricegap pairs`.

use serde::Serialize;
use std::fmt;

/// Grouping shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PairCategory {
    Popular,
    Stablecoin,
}

impl fmt::Display for PairCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Popular => write!(f, "popular"),
            Self::Stablecoin => write!(f, "stablecoin"),
        }
    }
}

/// A suggested pair with its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogPair {
    pub symbol: &'static str,
    pub base_currency: &'static str,
    pub name: &'static str,
    pub category: PairCategory,
}

const fn popular(
    symbol: &'static str,
    base_currency: &'static str,
    name: &'static str,
) -> CatalogPair {
    CatalogPair {
        symbol,
        base_currency,
        name,
        category: PairCategory::Popular,
    }
}

const fn stable(
    symbol: &'static str,
    base_currency: &'static str,
    name: &'static str,
) -> CatalogPair {
    CatalogPair {
        symbol,
        base_currency,
        name,
        category: PairCategory::Stablecoin,
    }
}

pub const POPULAR_PAIRS: [CatalogPair; 12] = [
    popular("BTC", "USDT", "Bitcoin/USDT"),
    popular("ETH", "USDT", "Ethereum/USDT"),
    popular("SOL", "USDT", "Solana/USDT"),
    popular("ADA", "USDT", "Cardano/USDT"),
    popular("DOT", "USDT", "Polkadot/USDT"),
    popular("DOGE", "USDT", "Dogecoin/USDT"),
    popular("XRP", "USDT", "Ripple/USDT"),
    popular("LINK", "USDT", "Chainlink/USDT"),
    popular("AVAX", "USDT", "Avalanche/USDT"),
    popular("MATIC", "USDT", "Polygon/USDT"),
    popular("BTC", "USD", "Bitcoin/USD"),
    popular("ETH", "USD", "Ethereum/USD"),
];

pub const STABLECOIN_PAIRS: [CatalogPair; 3] = [
    stable("USDT", "USD", "Tether/USD"),
    stable("USDC", "USD", "USD Coin/USD"),
    stable("BUSD", "USD", "Binance USD/USD"),
];

/// Every catalog entry, popular first.
pub fn all_pairs() -> impl Iterator<Item = &'static CatalogPair> {
    POPULAR_PAIRS.iter().chain(STABLECOIN_PAIRS.iter())
}

/// Case-insensitive lookup.
pub fn find(symbol: &str, base_currency: &str) -> Option<&'static CatalogPair> {
    all_pairs().find(|p| {
        p.symbol.eq_ignore_ascii_case(symbol) && p.base_currency.eq_ignore_ascii_case(base_currency)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(all_pairs().count(), 15);
        assert!(POPULAR_PAIRS
            .iter()
            .all(|p| p.category == PairCategory::Popular));
        assert!(STABLECOIN_PAIRS
            .iter()
            .all(|p| p.category == PairCategory::Stablecoin));
    }

    #[test]
    fn test_find() {
        let pair = find("eth", "usd").unwrap();
        assert_eq!(pair.name, "Ethereum/USD");
        assert_eq!(find("usdc", "USD").unwrap().category, PairCategory::Stablecoin);
        assert!(find("PEPE", "USDT").is_none());
    }
}
