//! Source adapter: normalize → transport → extract.
//!
//! Transport failures are logged and reported as `FetchOutcome::Failed`;
//! they never propagate as errors to the polling loop.

use pricegap_core::{Price, SourceId, TrackedPair};
use pricegap_feed::{parser, symbol, SourceIdentifier};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::error::TransportError;
use crate::transport::{PriceTransport, QuoteRequest};

/// Result of one adapter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Usable price.
    Price(Price),
    /// Transport succeeded but the response held nothing usable.
    NoData,
    /// Transport-level failure.
    Failed(TransportError),
    /// Source switched off, no call made.
    Disabled,
}

impl FetchOutcome {
    pub fn price(&self) -> Option<Price> {
        match self {
            Self::Price(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Metrics/log label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Price(_) => "price",
            Self::NoData => "no_data",
            Self::Failed(_) => "failed",
            Self::Disabled => "disabled",
        }
    }
}

/// One venue's adapter.
pub struct SourceAdapter {
    source: SourceId,
    enabled: bool,
    transport: Arc<dyn PriceTransport>,
}

impl SourceAdapter {
    pub fn new(source: SourceId, transport: Arc<dyn PriceTransport>) -> Self {
        Self {
            source,
            enabled: true,
            transport,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Fetch the current price of `pair` from this source.
    pub async fn fetch_price(&self, pair: &TrackedPair) -> FetchOutcome {
        if !self.enabled {
            debug!(source = %self.source, "Source disabled, skipping");
            return FetchOutcome::Disabled;
        }

        let identifier = symbol::normalize(self.source, &pair.symbol, &pair.base_currency);
        let outcome = self.fetch_identifier(&identifier).await;

        match outcome {
            FetchOutcome::NoData if self.wants_usd_fallback(pair) => {
                let fallback = match identifier {
                    SourceIdentifier::Slug { coin_id, .. } => SourceIdentifier::Slug {
                        coin_id,
                        currency: "usd".to_string(),
                    },
                    other => other,
                };
                info!(
                    source = %self.source,
                    base = %pair.base_currency,
                    identifier = %fallback,
                    "No stablecoin quote, retrying with USD"
                );
                self.fetch_identifier(&fallback).await
            }
            other => other,
        }
    }

    fn wants_usd_fallback(&self, pair: &TrackedPair) -> bool {
        self.source == SourceId::CoinGecko && symbol::is_usd_stablecoin(&pair.base_currency)
    }

    async fn fetch_identifier(&self, identifier: &SourceIdentifier) -> FetchOutcome {
        let request = match QuoteRequest::for_identifier(self.source, identifier) {
            Ok(request) => request,
            Err(e) => {
                error!(source = %self.source, error = %e, "Cannot build quote request");
                return FetchOutcome::NoData;
            }
        };

        let body = match self.transport.fetch(&request).await {
            Ok(body) => body,
            Err(e) => {
                error!(source = %self.source, request = %request, error = %e, "Price fetch failed");
                return FetchOutcome::Failed(e);
            }
        };

        if let Some(e) = venue_error(self.source, &body) {
            error!(source = %self.source, request = %request, error = %e, "Price fetch failed");
            return FetchOutcome::Failed(e);
        }

        match parser::extract(self.source, identifier, &body) {
            Some(price) => {
                debug!(source = %self.source, identifier = %identifier, price = %price, "Price fetched");
                FetchOutcome::Price(price)
            }
            None => FetchOutcome::NoData,
        }
    }
}

/// Kraken reports API errors inside a 200 body as a non-empty `error` array.
fn venue_error(source: SourceId, body: &Value) -> Option<TransportError> {
    if source != SourceId::Kraken {
        return None;
    }
    let errors = body.get("error")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    let joined = errors
        .iter()
        .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
        .collect::<Vec<_>>()
        .join(", ");
    Some(TransportError::Venue(joined))
}
