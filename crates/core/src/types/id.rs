//! Product identifiers.
//!
//! The upstream API numbers products with small positive integers. Route
//! parameters arrive as text, so [`ProductId`] parses from `&str` and rejects
//! anything that is not an unsigned integer before a request is built.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a product ID from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductIdError {
    /// The input was empty or only whitespace.
    #[error("product ID is missing")]
    Missing,
    /// The input was not an unsigned integer.
    #[error("product ID is not numeric: {0}")]
    NotNumeric(String),
}

/// Type-safe product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    /// Create a new ID from a u32 value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the underlying u32 value.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProductIdError::Missing);
        }
        trimmed
            .parse::<u32>()
            .map(Self)
            .map_err(|_| ProductIdError::NotNumeric(trimmed.to_string()))
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<ProductId> for u32 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}
