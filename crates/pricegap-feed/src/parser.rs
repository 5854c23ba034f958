//! Response extraction.
//!
//! Each source answers in its own JSON shape. The `parse_*` functions return
//! a typed reason when nothing usable is present; the public `extract_*`
//! wrappers log that reason at debug level and return `None` (NoData).

use crate::error::{FeedError, FeedResult};
use crate::symbol::SourceIdentifier;
use pricegap_core::{Price, SourceId};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

/// Full Kraken ticker for one pair.
///
/// Kraken sends every field as an array of strings; the index we read is
/// noted per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KrakenTicker {
    /// `c[0]`, last trade price.
    pub last: Price,
    /// `v[1]`, 24h volume.
    pub volume: Decimal,
    /// `p[1]`, 24h volume-weighted average price.
    pub vwap: Price,
    /// `l[1]`, 24h low.
    pub low: Price,
    /// `h[1]`, 24h high.
    pub high: Price,
    /// `b[0]`, best bid.
    pub bid: Price,
    /// `a[0]`, best ask.
    pub ask: Price,
}

/// Read a price from a JSON string or number.
fn parse_price_value(value: &Value, field: &str) -> FeedResult<Price> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(FeedError::InvalidData(format!(
                "{field}: expected string or number, got {other}"
            )))
        }
    };
    Price::parse_quote(&raw).map_err(|e| FeedError::InvalidData(format!("{field}: {e}")))
}

/// Binance 24h ticker: flat object with `lastPrice`.
pub fn parse_binance(response: &Value) -> FeedResult<Price> {
    let last = response
        .get("lastPrice")
        .ok_or_else(|| FeedError::MissingField("lastPrice".to_string()))?;
    parse_price_value(last, "lastPrice")
}

/// Locate the ticker object for `pair` inside a Kraken `result`.
///
/// Uses the requested key when present, otherwise the single key if the
/// result holds exactly one (Kraken may answer under its canonical name).
fn kraken_ticker_object<'a>(response: &'a Value, pair: &str) -> FeedResult<&'a Value> {
    let result = response
        .get("result")
        .and_then(Value::as_object)
        .ok_or_else(|| FeedError::MissingField("result".to_string()))?;

    if let Some(ticker) = result.get(pair) {
        return Ok(ticker);
    }

    let mut values = result.values();
    match (values.next(), values.next()) {
        (Some(only), None) => Ok(only),
        (None, _) => Err(FeedError::PairNotFound(format!("{pair}: empty result"))),
        (Some(_), Some(_)) => Err(FeedError::PairNotFound(format!(
            "{pair}: {} candidate keys, none requested",
            result.len()
        ))),
    }
}

fn kraken_field(ticker: &Value, key: &str, index: usize) -> FeedResult<Price> {
    let entry = ticker
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| FeedError::MissingField(key.to_string()))?
        .get(index)
        .ok_or_else(|| FeedError::MissingField(format!("{key}[{index}]")))?;
    parse_price_value(entry, &format!("{key}[{index}]"))
}

/// Kraken ticker: every field must parse or the whole ticker is rejected.
pub fn parse_kraken_ticker(response: &Value, pair: &str) -> FeedResult<KrakenTicker> {
    let ticker = kraken_ticker_object(response, pair)?;
    Ok(KrakenTicker {
        last: kraken_field(ticker, "c", 0)?,
        volume: kraken_field(ticker, "v", 1)?.inner(),
        vwap: kraken_field(ticker, "p", 1)?,
        low: kraken_field(ticker, "l", 1)?,
        high: kraken_field(ticker, "h", 1)?,
        bid: kraken_field(ticker, "b", 0)?,
        ask: kraken_field(ticker, "a", 0)?,
    })
}

/// CoinGecko simple price: `response[coin_id][currency]`.
pub fn parse_coingecko(response: &Value, coin_id: &str, currency: &str) -> FeedResult<Price> {
    let value = response
        .get(coin_id)
        .ok_or_else(|| FeedError::MissingField(coin_id.to_string()))?
        .get(currency)
        .ok_or_else(|| FeedError::MissingField(format!("{coin_id}.{currency}")))?;
    parse_price_value(value, &format!("{coin_id}.{currency}"))
}

fn no_data<T>(source: SourceId, result: FeedResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(source = %source, reason = %e, "No usable price in response");
            None
        }
    }
}

pub fn extract_binance(response: &Value) -> Option<Price> {
    no_data(SourceId::Binance, parse_binance(response))
}

pub fn extract_kraken_ticker(response: &Value, pair: &str) -> Option<KrakenTicker> {
    no_data(SourceId::Kraken, parse_kraken_ticker(response, pair))
}

/// Last trade price from a Kraken ticker response.
pub fn extract_kraken(response: &Value, pair: &str) -> Option<Price> {
    extract_kraken_ticker(response, pair).map(|t| t.last)
}

pub fn extract_coingecko(response: &Value, coin_id: &str, currency: &str) -> Option<Price> {
    no_data(
        SourceId::CoinGecko,
        parse_coingecko(response, coin_id, currency),
    )
}

/// Dispatch to the extractor for `source`.
pub fn extract(
    source: SourceId,
    identifier: &SourceIdentifier,
    response: &Value,
) -> Option<Price> {
    match (source, identifier) {
        (SourceId::Binance, _) => extract_binance(response),
        (SourceId::Kraken, SourceIdentifier::Pair(pair)) => extract_kraken(response, pair),
        (SourceId::CoinGecko, SourceIdentifier::Slug { coin_id, currency }) => {
            extract_coingecko(response, coin_id, currency)
        }
        (source, identifier) => no_data(
            source,
            Err(FeedError::IdentifierMismatch(identifier.to_string())),
        ),
    }
}
