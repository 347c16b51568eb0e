//! Upstream product API.
//!
//! # Architecture
//!
//! - [`ProductSource`] is the seam between page loaders and the data source
//! - [`ProductClient`] implements it over HTTP with `reqwest`
//! - No retries: every failure is returned to the caller in the same cycle
//!
//! # Endpoints
//!
//! ```text
//! GET {base}/products        - JSON array of products
//! GET {base}/products/{id}   - JSON product, `null`, or 404
//! ```

mod client;

use std::future::Future;

use catalog_core::{Product, ProductId};
use thiserror::Error;

pub use client::ProductClient;

/// Errors that can occur when talking to the upstream product API.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The product listing request returned a non-success status.
    #[error("API call failed with status: {0}")]
    Status(reqwest::StatusCode),

    /// A single-product request returned a non-success status other than 404.
    #[error("API call failed for product {id}. Status: {status}")]
    ProductStatus {
        id: ProductId,
        status: reqwest::StatusCode,
    },

    /// The listing response was `null` or empty.
    #[error("Failed to fetch products (unexpected return value)")]
    MissingData,

    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A source of catalog products.
pub trait ProductSource: Send + Sync {
    /// Fetch the full product collection.
    fn fetch_all_products(&self) -> impl Future<Output = Result<Vec<Product>, SourceError>> + Send;

    /// Fetch one product by its route parameter.
    ///
    /// Returns `Ok(None)` without a request when `id` is not numeric, and
    /// `Ok(None)` when the upstream reports the product as missing.
    fn fetch_product_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Product>, SourceError>> + Send;

    /// IDs of every product, or none if the listing cannot be fetched.
    fn fetch_all_product_ids(&self) -> impl Future<Output = Vec<ProductId>> + Send {
        async move {
            match self.fetch_all_products().await {
                Ok(products) => products.iter().map(|p| p.id).collect(),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to fetch product IDs");
                    Vec::new()
                }
            }
        }
    }
}
