//! Health check handlers.

use axum::extract::State;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the upstream.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Ready once the listing page has been generated without an upstream
/// error. A missing page is generated and a stale one revalidated, so a
/// failing readiness check recovers together with the upstream.
pub async fn readiness(State(state): State<AppState>) -> Result<&'static str> {
    let page = state.pages().listing().await;

    match &page.data.props.error {
        None => Ok("ready"),
        Some(error) => Err(AppError::Unavailable(format!(
            "listing page generated with an error: {error}"
        ))),
    }
}
