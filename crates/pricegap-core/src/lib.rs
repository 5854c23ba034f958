//! Core domain types for the pricegap discrepancy monitor.
//!
//! This crate provides the types shared by every other crate:
//! - `Price`: precision-safe quote value
//! - `SourceId`: the exchanges and aggregators we poll
//! - `TrackedPair`, `PricePoint`, `PriceSnapshot`: per-cycle observations
//! - `pairs`: catalog of well-known pairs offered to operators

pub mod decimal;
pub mod error;
pub mod pairs;
pub mod source;
pub mod types;

pub use decimal::Price;
pub use error::{CoreError, Result};
pub use pairs::{find as find_pair, CatalogPair, PairCategory, POPULAR_PAIRS, STABLECOIN_PAIRS};
pub use source::SourceId;
pub use types::{PricePoint, PriceSnapshot, TrackedPair};
