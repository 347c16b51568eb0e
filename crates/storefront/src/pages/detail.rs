//! Product detail page loader.

use catalog_core::Product;
use tracing::{error, info, instrument, warn};

use super::{DETAIL_REVALIDATE, PageData, RETRY_REVALIDATE};
use crate::upstream::ProductSource;

/// Error text for a detail route without an ID.
pub const MISSING_ID_ERROR: &str = "Product ID missing in URL.";

/// Props for the product detail page.
///
/// `product: None` with no error means the product does not exist; that is
/// shown as "not found", not as a failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailProps {
    pub product: Option<Product>,
    pub error: Option<String>,
}

/// How the detail page should be presented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailOutcome<'a> {
    Found(&'a Product),
    NotFound,
    Error(&'a str),
}

impl DetailProps {
    #[must_use]
    pub fn outcome(&self) -> DetailOutcome<'_> {
        match (&self.error, &self.product) {
            (Some(error), _) => DetailOutcome::Error(error),
            (None, Some(product)) => DetailOutcome::Found(product),
            (None, None) => DetailOutcome::NotFound,
        }
    }
}

/// Fetch one product for its detail page.
#[instrument(skip(source))]
pub async fn load_detail<S: ProductSource>(source: &S, id: Option<&str>) -> PageData<DetailProps> {
    let Some(id) = id.filter(|id| !id.is_empty()) else {
        error!("Product ID missing in route parameters");
        return PageData {
            props: DetailProps {
                product: None,
                error: Some(MISSING_ID_ERROR.to_string()),
            },
            revalidate: RETRY_REVALIDATE,
        };
    };

    match source.fetch_product_by_id(id).await {
        Ok(Some(product)) => {
            info!("Detail page generated");
            PageData {
                props: DetailProps {
                    product: Some(product),
                    error: None,
                },
                revalidate: DETAIL_REVALIDATE,
            }
        }
        Ok(None) => {
            warn!("Product not found");
            PageData {
                props: DetailProps::default(),
                revalidate: RETRY_REVALIDATE,
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch product for detail page");
            PageData {
                props: DetailProps {
                    product: None,
                    error: Some(e.to_string()),
                },
                revalidate: RETRY_REVALIDATE,
            }
        }
    }
}
