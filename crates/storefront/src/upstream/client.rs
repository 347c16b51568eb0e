//! HTTP client for the upstream product API.

use std::sync::Arc;

use catalog_core::{Product, ProductId};
use reqwest::StatusCode;
use tracing::{error, info, instrument, warn};

use super::{ProductSource, SourceError};
use crate::config::UpstreamConfig;

/// Client for the upstream product API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ProductClient {
    inner: Arc<ProductClientInner>,
}

struct ProductClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ProductClient {
    /// Create a new client for the configured upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &UpstreamConfig) -> Result<Self, SourceError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(ProductClientInner {
                client: builder.build()?,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Issue a GET and return the status and body text.
    async fn get(&self, url: &str) -> Result<(StatusCode, String), SourceError> {
        let response = match self.inner.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, url = %url, "Upstream request failed");
                return Err(SourceError::Http(e));
            }
        };

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

impl ProductSource for ProductClient {
    #[instrument(skip(self))]
    async fn fetch_all_products(&self) -> Result<Vec<Product>, SourceError> {
        let url = format!("{}/products", self.inner.base_url);
        let (status, body) = self.get(&url).await?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Upstream returned non-success status for product listing"
            );
            return Err(SourceError::Status(status));
        }

        if body.trim().is_empty() {
            warn!("Upstream returned an empty product listing body");
            return Err(SourceError::MissingData);
        }

        let products: Option<Vec<Product>> = match serde_json::from_str(&body) {
            Ok(products) => products,
            Err(e) => {
                error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse product listing"
                );
                return Err(SourceError::Parse(e));
            }
        };

        let products = products.ok_or_else(|| {
            warn!("Upstream returned null for product listing");
            SourceError::MissingData
        })?;

        info!(count = products.len(), "Fetched products");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn fetch_product_by_id(&self, id: &str) -> Result<Option<Product>, SourceError> {
        let product_id = match id.parse::<ProductId>() {
            Ok(product_id) => product_id,
            Err(e) => {
                warn!(error = %e, "Invalid product ID, skipping request");
                return Ok(None);
            }
        };

        let url = format!("{}/products/{product_id}", self.inner.base_url);
        let (status, body) = self.get(&url).await?;

        if status == StatusCode::NOT_FOUND {
            warn!(url = %url, "Product not found (404)");
            return Ok(None);
        }

        if !status.is_success() {
            error!(
                status = %status,
                url = %url,
                body = %body.chars().take(500).collect::<String>(),
                "Upstream returned non-success status for product"
            );
            return Err(SourceError::ProductStatus {
                id: product_id,
                status,
            });
        }

        if body.trim().is_empty() {
            warn!(url = %url, "Product body is empty despite OK status");
            return Ok(None);
        }

        let product: Option<Product> = match serde_json::from_str(&body) {
            Ok(product) => product,
            Err(e) => {
                error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse product"
                );
                return Err(SourceError::Parse(e));
            }
        };

        match &product {
            Some(p) => info!(title = %p.title, "Fetched product"),
            None => warn!(url = %url, "Product data is null despite OK status"),
        }
        Ok(product)
    }
}
