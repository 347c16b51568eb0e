//! HTTP route handlers for the catalog.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                   - Product listing (alias of /products)
//! GET  /products           - Product listing; ?q=&category=&sort=&order=&page=
//! GET  /products/{id}      - Product detail
//! GET  /health             - Liveness
//! GET  /health/ready       - Readiness (listing generated without error)
//! ```

pub mod health;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}
