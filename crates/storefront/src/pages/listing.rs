//! Listing page loader.

use catalog_core::Product;
use catalog_core::listing::category_set;
use tracing::{error, info, instrument};

use super::{LISTING_REVALIDATE, PageData, RETRY_REVALIDATE};
use crate::upstream::ProductSource;

/// Props for the product listing page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingProps {
    pub products: Vec<Product>,
    /// `"All"` followed by the sorted distinct categories; empty on error.
    pub categories: Vec<String>,
    pub error: Option<String>,
}

/// Fetch every product and derive the category set.
#[instrument(skip_all)]
pub async fn load_listing<S: ProductSource>(source: &S) -> PageData<ListingProps> {
    info!("Fetching all products and categories");

    match source.fetch_all_products().await {
        Ok(products) => {
            let categories = category_set(&products);
            info!(
                products = products.len(),
                categories = categories.len().saturating_sub(1),
                "Listing page generated"
            );
            PageData {
                props: ListingProps {
                    products,
                    categories,
                    error: None,
                },
                revalidate: LISTING_REVALIDATE,
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch products for listing");
            PageData {
                props: ListingProps {
                    products: Vec::new(),
                    categories: Vec::new(),
                    error: Some(e.to_string()),
                },
                revalidate: RETRY_REVALIDATE,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::UpstreamConfig;
    use crate::upstream::ProductClient;

    fn client_for(server: &MockServer) -> ProductClient {
        ProductClient::new(&UpstreamConfig::new(&server.uri()).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_listing_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "title": "Red Shirt", "price": 10, "category": "men" },
                { "id": 2, "title": "Blue Hat", "price": 20, "category": "men" },
                { "id": 3, "title": "Green Scarf", "price": 5, "category": "women" },
            ])))
            .mount(&server)
            .await;

        let page = load_listing(&client_for(&server)).await;
        assert_eq!(page.revalidate, LISTING_REVALIDATE);
        assert_eq!(page.props.products.len(), 3);
        assert_eq!(page.props.categories, vec!["All", "men", "women"]);
        assert!(page.props.error.is_none());
    }

    #[tokio::test]
    async fn test_listing_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let page = load_listing(&client_for(&server)).await;
        assert_eq!(page.revalidate, RETRY_REVALIDATE);
        assert!(page.props.products.is_empty());
        assert!(page.props.categories.is_empty());
        assert!(page.props.error.unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_listing_is_idempotent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "id": 1, "title": "Ring", "category": "jewelery" }])),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(load_listing(&client).await, load_listing(&client).await);
    }
}
