//! Page data loaders and the cache that serves their output.
//!
//! # Architecture
//!
//! - Loaders ([`load_listing`], [`load_detail`]) turn upstream results into
//!   page props plus a revalidation hint. They never fail.
//! - [`PageCache`] keeps generated pages and regenerates them once their
//!   hint has elapsed, serving the stale page meanwhile.
//! - [`start_prerender`] generates every page in the background at startup.
//!
//! # Revalidation
//!
//! ```text
//! listing, ok           10 minutes
//! detail, found         1 hour
//! anything else         1 minute
//! ```

mod cache;
mod detail;
mod listing;
mod prerender;

use std::time::Duration;

pub use cache::{PageCache, Rendered};
pub use detail::{DetailOutcome, DetailProps, MISSING_ID_ERROR, load_detail};
pub use listing::{ListingProps, load_listing};
pub use prerender::start_prerender;

/// Listing pages that loaded successfully.
pub const LISTING_REVALIDATE: Duration = Duration::from_secs(10 * 60);

/// Detail pages for a product that was found.
pub const DETAIL_REVALIDATE: Duration = Duration::from_secs(60 * 60);

/// Pages that hit an error or a missing product.
pub const RETRY_REVALIDATE: Duration = Duration::from_secs(60);

/// Props for one page together with how long they stay fresh.
#[derive(Debug, Clone, PartialEq)]
pub struct PageData<P> {
    pub props: P,
    pub revalidate: Duration,
}
