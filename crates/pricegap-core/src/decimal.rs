//! Precision-safe decimal price type.
//!
//! Uses `rust_decimal` for exact decimal arithmetic so that percentage
//! differences between venues are not distorted by floating-point noise.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Quoted price with exact decimal precision.
///
/// A missing quote is modelled as `Option<Price>`, never as `Price::ZERO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);
    pub const ONE: Self = Self(Decimal::ONE);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Parse a quote from a venue payload.
    ///
    /// Accepts plain and scientific notation ("5e-5"). Zero and negative
    /// quotes are kept as-is; the comparison arithmetic decides what they mean.
    pub fn parse_quote(raw: &str) -> crate::Result<Self> {
        let trimmed = raw.trim();
        let value = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| CoreError::InvalidPrice(raw.to_string()))?;
        Ok(Self(value))
    }

    /// Checked sum, `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Price) -> Option<Price> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Absolute distance between two prices, `None` on overflow.
    #[inline]
    pub fn checked_abs_diff(&self, other: Price) -> Option<Decimal> {
        self.0.checked_sub(other.0).map(|d| d.abs())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Forward so that `{:.2}` style precision reaches the decimal.
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}
