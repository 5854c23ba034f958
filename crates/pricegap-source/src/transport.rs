//! Transport capability injected into source adapters.

use async_trait::async_trait;
use pricegap_core::SourceId;
use pricegap_feed::SourceIdentifier;
use std::fmt;

use crate::error::{SourceError, SourceResult, TransportError};

/// A single quote lookup against one venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteRequest {
    /// Binance 24h ticker for a pair code.
    BinanceTicker { symbol: String },
    /// Kraken public ticker for a pair code.
    KrakenTicker { pair: String },
    /// CoinGecko simple price for a coin slug in one currency.
    CoinGeckoSimplePrice { coin_id: String, currency: String },
}

impl QuoteRequest {
    /// Build the request matching a normalized identifier.
    pub fn for_identifier(source: SourceId, identifier: &SourceIdentifier) -> SourceResult<Self> {
        match (source, identifier) {
            (SourceId::Binance, SourceIdentifier::Pair(symbol)) => Ok(Self::BinanceTicker {
                symbol: symbol.clone(),
            }),
            (SourceId::Kraken, SourceIdentifier::Pair(pair)) => {
                Ok(Self::KrakenTicker { pair: pair.clone() })
            }
            (SourceId::CoinGecko, SourceIdentifier::Slug { coin_id, currency }) => {
                Ok(Self::CoinGeckoSimplePrice {
                    coin_id: coin_id.clone(),
                    currency: currency.clone(),
                })
            }
            (source, identifier) => Err(SourceError::InvalidRequest(format!(
                "{source} cannot be queried with identifier {identifier}"
            ))),
        }
    }

    pub fn source(&self) -> SourceId {
        match self {
            Self::BinanceTicker { .. } => SourceId::Binance,
            Self::KrakenTicker { .. } => SourceId::Kraken,
            Self::CoinGeckoSimplePrice { .. } => SourceId::CoinGecko,
        }
    }
}

impl fmt::Display for QuoteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BinanceTicker { symbol } => write!(f, "binance:{symbol}"),
            Self::KrakenTicker { pair } => write!(f, "kraken:{pair}"),
            Self::CoinGeckoSimplePrice { coin_id, currency } => {
                write!(f, "coingecko:{coin_id}/{currency}")
            }
        }
    }
}

/// Fetches the raw JSON body for a quote request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceTransport: Send + Sync {
    async fn fetch(&self, request: &QuoteRequest) -> Result<serde_json::Value, TransportError>;
}
