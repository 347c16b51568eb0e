//! End-to-end tests for the catalog storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-integration-tests
//!
//! # Include the test against the live product API
//! cargo test -p catalog-integration-tests -- --ignored
//! ```
//!
//! [`TestContext`] serves the full router on an ephemeral port against a
//! mock upstream, and tests talk to it over real TCP with `reqwest`.

use catalog_storefront::config::{CatalogConfig, UpstreamConfig};
use catalog_storefront::state::AppState;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A running storefront and the mock upstream behind it.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
    pub upstream: MockServer,
}

impl TestContext {
    /// Start a storefront against an upstream serving [`fixture_products`].
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn new() -> Self {
        let upstream = MockServer::start().await;
        mount_fixture(&upstream).await;
        Self::with_upstream(upstream).await
    }

    /// Start a storefront against an already configured upstream.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn with_upstream(upstream: MockServer) -> Self {
        let base_url = serve(&upstream.uri()).await;

        Self {
            client: reqwest::Client::new(),
            base_url,
            upstream,
        }
    }

    /// GET `path` and return the status and body text.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, String) {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("Failed to send request");
        let status = resp.status();
        (status, resp.text().await.expect("Failed to read body"))
    }
}

/// Serve the storefront against `upstream_url`, returning its base URL.
///
/// # Panics
///
/// Panics if the server cannot be started.
pub async fn serve(upstream_url: &str) -> String {
    let upstream = UpstreamConfig::new(upstream_url).expect("Invalid upstream URL");
    let state =
        AppState::new(CatalogConfig::with_upstream(upstream)).expect("Failed to build state");
    let app = catalog_storefront::app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to address");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    format!("http://{addr}")
}

/// Twelve products over three categories, priced 1 to 12.
#[must_use]
pub fn fixture_products() -> Vec<Value> {
    (1..=12)
        .map(|id: u32| {
            let category = match id % 3 {
                0 => "electronics",
                1 => "jewelery",
                _ => "men's clothing",
            };
            json!({
                "id": id,
                "title": format!("Product {id:02}"),
                "price": id,
                "description": format!("Description of product {id}"),
                "category": category,
                "image": format!("https://fakestoreapi.com/img/{id}.jpg"),
                "rating": { "rate": 4.5, "count": id * 10 }
            })
        })
        .collect()
}

/// Mount the listing and per-product endpoints for [`fixture_products`].
pub async fn mount_fixture(server: &MockServer) {
    let products = fixture_products();

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&products))
        .mount(server)
        .await;

    for product in products {
        Mock::given(method("GET"))
            .and(path(format!("/products/{}", product["id"])))
            .respond_with(ResponseTemplate::new(200).set_body_json(product))
            .mount(server)
            .await;
    }
}
