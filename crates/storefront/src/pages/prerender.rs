//! Startup pre-generation of every page.

use tokio::task::JoinHandle;
use tracing::{info, instrument};

use super::PageCache;
use crate::upstream::ProductSource;

/// Generate the listing page and one detail page per known product in the
/// background.
///
/// Requests that arrive before a page is ready generate it on demand.
pub fn start_prerender<S: ProductSource + 'static>(cache: PageCache<S>) -> JoinHandle<usize> {
    tokio::spawn(async move { prerender(&cache).await })
}

#[instrument(skip_all)]
async fn prerender<S: ProductSource + 'static>(cache: &PageCache<S>) -> usize {
    info!("Pre-generating pages");

    let listing = cache.listing().await;
    let listing_ok = listing.data.props.error.is_none();

    let ids = cache.source().fetch_all_product_ids().await;
    let mut generated = 0;
    for id in &ids {
        let page = cache.detail(&id.to_string()).await;
        if page.data.props.product.is_some() {
            generated += 1;
        }
    }

    info!(
        listing_ok,
        products = ids.len(),
        details = generated,
        "Pre-generation finished"
    );
    generated
}
