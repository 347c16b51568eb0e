//! Application state shared across handlers.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::CatalogConfig;
use crate::pages::{self, PageCache};
use crate::upstream::{ProductClient, SourceError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CatalogConfig,
    pages: PageCache<ProductClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream HTTP client cannot be built.
    pub fn new(config: CatalogConfig) -> Result<Self, SourceError> {
        let client = ProductClient::new(&config.upstream)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pages: PageCache::new(client),
            }),
        })
    }

    /// Get a reference to the catalog configuration.
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    /// Get a reference to the generated page cache.
    #[must_use]
    pub fn pages(&self) -> &PageCache<ProductClient> {
        &self.inner.pages
    }

    /// Pre-generate every page in the background.
    pub fn start_prerender(&self) -> JoinHandle<usize> {
        pages::start_prerender(self.inner.pages.clone())
    }
}
