//! Filter, search, sort and paginate a product slice.

use std::cmp::Ordering;

use super::selection::{Selection, SortField, SortOrder};
use crate::types::{Price, Product};

/// Products shown per listing page.
pub const PAGE_SIZE: usize = 8;

/// One page of a refined listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<'a> {
    /// Products on the selected page, in display order.
    pub visible: Vec<&'a Product>,
    /// `ceil(matched / PAGE_SIZE)`; zero when nothing matched.
    pub total_pages: u32,
    /// Products that passed the category and search filters.
    pub matched: usize,
}

/// Apply the category filter, the search filter and the sort of `selection`.
///
/// `products` is never reordered; the result borrows from it.
#[must_use]
pub fn refine<'a>(products: &'a [Product], selection: &Selection) -> Vec<&'a Product> {
    let needle = selection.search().trim().to_lowercase();

    let mut refined: Vec<&Product> = products
        .iter()
        .filter(|p| selection.category().matches(p))
        .filter(|p| needle.is_empty() || p.title.to_lowercase().contains(&needle))
        .collect();

    let sort = selection.sort();
    if let Some(field) = sort.field {
        // Keys are computed once; sort_by is stable so ties keep filter order.
        let mut keyed: Vec<(SortKey, &Product)> = refined
            .into_iter()
            .map(|p| (SortKey::of(p, field), p))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| directed(a.cmp(b), sort.order));
        refined = keyed.into_iter().map(|(_, p)| p).collect();
    }

    refined
}

/// Number of pages needed for `count` items.
#[must_use]
pub fn total_pages(count: usize) -> u32 {
    u32::try_from(count.div_ceil(PAGE_SIZE)).unwrap_or(u32::MAX)
}

/// The items on 1-based `page`. Out-of-range pages yield an empty slice.
#[must_use]
pub fn paginate<T>(items: &[T], page: u32) -> &[T] {
    let index = usize::try_from(page.saturating_sub(1)).unwrap_or(usize::MAX);
    let start = index.saturating_mul(PAGE_SIZE).min(items.len());
    let end = start.saturating_add(PAGE_SIZE).min(items.len());
    items.get(start..end).unwrap_or_default()
}

/// Run the whole pipeline for one selection.
#[must_use]
pub fn render<'a>(products: &'a [Product], selection: &Selection) -> Listing<'a> {
    let refined = refine(products, selection);
    let total_pages = total_pages(refined.len());
    let visible = paginate(&refined, selection.page()).to_vec();

    Listing {
        visible,
        total_pages,
        matched: refined.len(),
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Price(Price),
    Title(String),
}

impl SortKey {
    fn of(product: &Product, field: SortField) -> Self {
        match field {
            SortField::Price => Self::Price(product.price),
            SortField::Title => Self::Title(product.title.to_lowercase()),
        }
    }
}

const fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}
