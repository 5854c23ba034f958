//! Symbol normalization and response extraction for pricegap sources.
//!
//! Both halves are pure: `symbol` maps a generic pair into each venue's
//! identifier format, `parser` pulls a canonical price out of each venue's
//! response shape.

pub mod error;
pub mod parser;
pub mod symbol;

pub use error::{FeedError, FeedResult};
pub use parser::{extract, extract_binance, extract_coingecko, extract_kraken, KrakenTicker};
pub use symbol::{normalize, SourceIdentifier};
