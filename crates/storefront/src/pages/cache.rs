//! Generated page cache with stale-while-revalidate semantics.
//!
//! A miss generates the page before responding; concurrent misses for one
//! key share a single generation. A hit past its revalidation hint is served
//! as-is while one background task regenerates it.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use catalog_core::ProductId;
use moka::future::Cache;
use tracing::{debug, info};

use super::{DetailProps, ListingProps, PageData, load_detail, load_listing};
use crate::upstream::ProductSource;

/// Upper bound on cached detail pages.
const MAX_DETAIL_PAGES: u64 = 1000;

/// Identifies a page for refresh bookkeeping.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum PageKey {
    Listing,
    Detail(ProductId),
}

/// A page as generated at a point in time.
#[derive(Debug)]
pub struct Rendered<P> {
    pub data: PageData<P>,
    generated_at: Instant,
}

impl<P> Rendered<P> {
    fn now(data: PageData<P>) -> Self {
        Self {
            data,
            generated_at: Instant::now(),
        }
    }

    /// Time since the page was generated.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.generated_at.elapsed()
    }

    /// Whether the revalidation hint has elapsed.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.age() >= self.data.revalidate
    }
}

/// Cache of generated listing and detail pages.
pub struct PageCache<S> {
    inner: Arc<PageCacheInner<S>>,
}

struct PageCacheInner<S> {
    source: S,
    listing: Cache<(), Arc<Rendered<ListingProps>>>,
    details: Cache<ProductId, Arc<Rendered<DetailProps>>>,
    refreshing: Mutex<HashSet<PageKey>>,
}

impl<S> Clone for PageCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ProductSource + 'static> PageCache<S> {
    /// Create an empty cache that generates pages from `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            inner: Arc::new(PageCacheInner {
                source,
                listing: Cache::builder().max_capacity(1).build(),
                details: Cache::builder().max_capacity(MAX_DETAIL_PAGES).build(),
                refreshing: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// The source pages are generated from.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// The listing page, generating it if needed.
    pub async fn listing(&self) -> Arc<Rendered<ListingProps>> {
        if let Some(page) = self.inner.listing.get(&()).await {
            if page.is_stale() {
                let inner = Arc::clone(&self.inner);
                self.spawn_refresh(PageKey::Listing, async move {
                    let page = Rendered::now(load_listing(&inner.source).await);
                    inner.listing.insert((), Arc::new(page)).await;
                });
            }
            return page;
        }

        debug!("Listing page not cached, generating");
        self.inner
            .listing
            .get_with((), async {
                Arc::new(Rendered::now(load_listing(&self.inner.source).await))
            })
            .await
    }

    /// The detail page for route parameter `id`, generating it if needed.
    ///
    /// Pages are keyed by the parsed ID, so `"1"` and `"01"` share one entry.
    /// An ID that does not parse never reaches the upstream and is not cached.
    pub async fn detail(&self, id: &str) -> Arc<Rendered<DetailProps>> {
        let Ok(key) = id.parse::<ProductId>() else {
            return Arc::new(Rendered::now(load_detail(&self.inner.source, Some(id)).await));
        };

        if let Some(page) = self.inner.details.get(&key).await {
            if page.is_stale() {
                let inner = Arc::clone(&self.inner);
                self.spawn_refresh(PageKey::Detail(key), async move {
                    let page = Rendered::now(load_detail(&inner.source, Some(&key.to_string())).await);
                    inner.details.insert(key, Arc::new(page)).await;
                });
            }
            return page;
        }

        debug!(id = %key, "Detail page not cached, generating");
        self.inner
            .details
            .get_with(key, async {
                Arc::new(Rendered::now(
                    load_detail(&self.inner.source, Some(&key.to_string())).await,
                ))
            })
            .await
    }

    /// The cached listing page, without generating one.
    pub async fn cached_listing(&self) -> Option<Arc<Rendered<ListingProps>>> {
        self.inner.listing.get(&()).await
    }

    /// Run `refresh` in the background unless one is already running for `key`.
    fn spawn_refresh<F>(&self, key: PageKey, refresh: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let newly_marked = self
            .inner
            .refreshing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());
        if !newly_marked {
            return;
        }

        info!(page = ?key, "Revalidating stale page");
        let guard = RefreshGuard {
            inner: Arc::clone(&self.inner),
            key,
        };
        tokio::spawn(async move {
            let _guard = guard;
            refresh.await;
        });
    }
}

/// Clears a page's refresh mark when its task ends, including by panic.
struct RefreshGuard<S> {
    inner: Arc<PageCacheInner<S>>,
    key: PageKey,
}

impl<S> Drop for RefreshGuard<S> {
    fn drop(&mut self) {
        self.inner
            .refreshing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use catalog_core::{Price, Product, ProductId};

    use super::*;
    use crate::upstream::SourceError;

    /// Source that counts calls and can be switched to failing or panicking.
    #[derive(Default)]
    struct FakeSource {
        listing_calls: AtomicUsize,
        detail_calls: AtomicUsize,
        failing: AtomicBool,
        panicking: AtomicBool,
    }

    impl FakeSource {
        fn products() -> Vec<Product> {
            vec![
                Product::new(ProductId::new(1), "Red Shirt", Price::from_cents(1000), "men"),
                Product::new(ProductId::new(2), "Green Scarf", Price::from_cents(500), "women"),
            ]
        }
    }

    impl ProductSource for FakeSource {
        async fn fetch_all_products(&self) -> Result<Vec<Product>, SourceError> {
            self.listing_calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            assert!(!self.panicking.load(Ordering::SeqCst), "listing source panicked");
            if self.failing.load(Ordering::SeqCst) {
                return Err(SourceError::MissingData);
            }
            Ok(Self::products())
        }

        async fn fetch_product_by_id(&self, id: &str) -> Result<Option<Product>, SourceError> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            let Ok(id) = id.parse::<ProductId>() else {
                return Ok(None);
            };
            Ok(Self::products().into_iter().find(|p| p.id == id))
        }
    }

    fn stale<P>(data: PageData<P>) -> Arc<Rendered<P>> {
        let mut page = Rendered::now(data);
        page.generated_at = Instant::now()
            .checked_sub(page.data.revalidate + Duration::from_secs(1))
            .unwrap();
        Arc::new(page)
    }

    async fn wait_for_fresh_listing(cache: &PageCache<FakeSource>) -> Arc<Rendered<ListingProps>> {
        for _ in 0..100 {
            tokio::task::yield_now().await;
            let page = cache.cached_listing().await.unwrap();
            if !page.is_stale() {
                return page;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("listing was never refreshed");
    }

    async fn wait_until_not_refreshing(cache: &PageCache<FakeSource>, key: &PageKey) {
        for _ in 0..100 {
            tokio::task::yield_now().await;
            if !cache.inner.refreshing.lock().unwrap().contains(key) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("{key:?} still marked as refreshing");
    }

    #[tokio::test]
    async fn test_miss_generates_then_hit_is_cached() {
        let cache = PageCache::new(FakeSource::default());

        let first = cache.listing().await;
        let second = cache.listing().await;

        assert_eq!(first.data.props.products.len(), 2);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.source().listing_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_generation() {
        let cache = PageCache::new(FakeSource::default());

        let (a, b, c) = tokio::join!(cache.listing(), cache.listing(), cache.listing());

        assert!(Arc::ptr_eq(&a, &b) && Arc::ptr_eq(&b, &c));
        assert_eq!(cache.source().listing_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_page_served_then_refreshed() {
        let cache = PageCache::new(FakeSource::default());
        cache.source().failing.store(true, Ordering::SeqCst);

        let failed = cache.listing().await;
        assert!(failed.data.props.error.is_some());

        // Age the error page past its hint and let the upstream recover.
        cache
            .inner
            .listing
            .insert((), stale(failed.data.clone()))
            .await;
        cache.source().failing.store(false, Ordering::SeqCst);

        let served = cache.listing().await;
        assert!(served.data.props.error.is_some(), "stale page is served first");

        for _ in 0..100 {
            tokio::task::yield_now().await;
            if cache.cached_listing().await.unwrap().data.props.error.is_none() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let refreshed = cache.cached_listing().await.unwrap();
        assert!(refreshed.data.props.error.is_none());
        assert!(!refreshed.is_stale());
        assert_eq!(cache.source().listing_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_detail_pages_cached_per_id() {
        let cache = PageCache::new(FakeSource::default());

        let found = cache.detail("1").await;
        let missing = cache.detail("99").await;
        let again = cache.detail("1").await;

        assert!(found.data.props.product.is_some());
        assert!(missing.data.props.product.is_none());
        assert!(missing.data.props.error.is_none());
        assert!(Arc::ptr_eq(&found, &again));
        assert_eq!(cache.source().detail_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_detail_ids_share_one_entry() {
        let cache = PageCache::new(FakeSource::default());

        let plain = cache.detail("1").await;
        let padded = cache.detail("01").await;
        let spaced = cache.detail(" 1").await;

        assert!(plain.data.props.product.is_some());
        assert!(Arc::ptr_eq(&plain, &padded) && Arc::ptr_eq(&plain, &spaced));
        assert_eq!(cache.source().detail_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unparseable_detail_ids_are_not_cached() {
        let cache = PageCache::new(FakeSource::default());

        let page = cache.detail("abc").await;

        assert!(page.data.props.product.is_none());
        assert!(page.data.props.error.is_none());
        assert_eq!(cache.inner.details.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_panicking_refresh_does_not_block_later_refreshes() {
        let cache = PageCache::new(FakeSource::default());
        let page = cache.listing().await;

        cache.inner.listing.insert((), stale(page.data.clone())).await;
        cache.source().panicking.store(true, Ordering::SeqCst);
        let served = cache.listing().await;
        assert!(served.is_stale());
        wait_until_not_refreshing(&cache, &PageKey::Listing).await;

        cache.source().panicking.store(false, Ordering::SeqCst);
        cache.listing().await;
        let refreshed = wait_for_fresh_listing(&cache).await;

        assert!(refreshed.data.props.error.is_none());
        assert_eq!(cache.source().listing_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poisoned_refresh_set_still_refreshes() {
        let cache = PageCache::new(FakeSource::default());
        let page = cache.listing().await;

        let inner = Arc::clone(&cache.inner);
        let poisoner = std::thread::spawn(move || {
            let _held = inner.refreshing.lock().unwrap();
            panic!("poison the refresh set");
        });
        assert!(poisoner.join().is_err());
        assert!(cache.inner.refreshing.is_poisoned());

        cache.inner.listing.insert((), stale(page.data.clone())).await;
        cache.listing().await;
        wait_for_fresh_listing(&cache).await;

        assert_eq!(cache.source().listing_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fresh_page_is_not_stale() {
        let cache = PageCache::new(FakeSource::default());
        let page = cache.detail("2").await;
        assert!(!page.is_stale());
        assert!(page.age() < page.data.revalidate);
    }
}
