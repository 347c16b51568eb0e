//! Type-safe price representation using decimal arithmetic.
//!
//! The upstream API sends prices as JSON numbers in US dollars (e.g.
//! `109.95`). They are parsed into a [`Decimal`] so that sorting and
//! formatting never go through binary floating point.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in US dollars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price, used when the upstream omits one.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the amount in dollars.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

/// Formats as `$12.30`, always with two decimal places.
impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0.round_dp(2))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_places() {
        assert_eq!(Price::from_cents(1000).to_string(), "$10.00");
        assert_eq!(Price::from_cents(10995).to_string(), "$109.95");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_deserialize_json_number() {
        let price: Price = serde_json::from_str("109.95").unwrap();
        assert_eq!(price, Price::from_cents(10995));

        let price: Price = serde_json::from_str("20").unwrap();
        assert_eq!(price, Price::from_cents(2000));
    }

    #[test]
    fn test_ordering_is_numeric() {
        assert!(Price::from_cents(500) < Price::from_cents(1000));
        assert!(Price::from_cents(1000) < Price::from_cents(10000));
    }
}
