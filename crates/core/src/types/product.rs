//! The product record served by the upstream catalog API.
//!
//! Deserialization is permissive: fields the upstream leaves out or sends as
//! `null` fall back to empty text, a zero price, no image and an empty
//! rating instead of failing the whole response.

use serde::{Deserialize, Deserializer, Serialize};

use super::{Price, ProductId};

/// Aggregate customer rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average score (0-5).
    #[serde(default, deserialize_with = "null_as_default")]
    pub rate: f64,
    /// Number of ratings.
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u32,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Price,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    /// Image URL. `None` when absent, `null` or empty.
    #[serde(default, deserialize_with = "non_empty")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: Rating,
}

impl Product {
    /// Create a product with the fields the listing pipeline reads.
    #[must_use]
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        price: Price,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            description: String::new(),
            category: category.into(),
            image: None,
            rating: Rating::default(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
