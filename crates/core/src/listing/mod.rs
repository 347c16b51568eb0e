//! Derived state for the product listing page.
//!
//! ```text
//! products ──► category filter ──► search filter ──► sort ──► paginate ──► visible
//!                     ▲                  ▲             ▲          ▲
//!                     └──────────────── Selection ─────┴──────────┘
//! ```
//!
//! Everything here is a pure function of `(&[Product], &Selection)`. The
//! route handler owns the [`Selection`] for one request and derives links
//! from it through the reducer methods.

pub mod categories;
pub mod pipeline;
pub mod selection;

pub use categories::{ALL_CATEGORIES, category_set};
pub use pipeline::{Listing, PAGE_SIZE, paginate, refine, render, total_pages};
pub use selection::{CategoryFilter, Selection, SelectionQuery, SortField, SortOrder, SortSpec};
