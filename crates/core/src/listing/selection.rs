//! Selection state for the listing page and the reducers that evolve it.
//!
//! A [`Selection`] is an immutable value. Each reducer consumes it and
//! returns the next selection; changing the search term, the category or the
//! sort spec always lands on page 1.

use serde::{Deserialize, Serialize};

use super::categories::ALL_CATEGORIES;
use crate::types::Product;

/// Which products the category control admits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    /// No filtering.
    #[default]
    All,
    /// Only products whose category equals this label exactly.
    Only(String),
}

impl CategoryFilter {
    /// Interpret a label from the category control. `"All"` means no filter;
    /// any other label, the empty one included, is matched exactly.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(label.to_string())
        }
    }

    /// The label shown in (and submitted by) the category control.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Only(label) => label,
        }
    }

    /// Case-sensitive equality against the product's category.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(label) => product.category == *label,
        }
    }
}

/// Field a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Price,
    Title,
}

impl SortField {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Title => "title",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "price" => Some(Self::Price),
            "title" => Some(Self::Title),
            _ => None,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Sort field (if any) and direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub field: Option<SortField>,
    pub order: SortOrder,
}

impl SortSpec {
    #[must_use]
    pub const fn by(field: SortField, order: SortOrder) -> Self {
        Self {
            field: Some(field),
            order,
        }
    }
}

/// Raw listing query parameters.
///
/// Every field is optional text so that a malformed value falls back to its
/// default instead of rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
}

/// User-controlled search, filter, sort and page parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    search: String,
    category: CategoryFilter,
    sort: SortSpec,
    page: u32,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: CategoryFilter::All,
            sort: SortSpec::default(),
            page: 1,
        }
    }
}

impl Selection {
    /// The search term as entered (untrimmed).
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub const fn category(&self) -> &CategoryFilter {
        &self.category
    }

    #[must_use]
    pub const fn sort(&self) -> SortSpec {
        self.sort
    }

    /// Current page, 1-based.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn with_search(self, term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            page: 1,
            ..self
        }
    }

    #[must_use]
    pub fn with_category(self, category: CategoryFilter) -> Self {
        Self {
            category,
            page: 1,
            ..self
        }
    }

    #[must_use]
    pub fn with_sort(self, sort: SortSpec) -> Self {
        Self {
            sort,
            page: 1,
            ..self
        }
    }

    /// Sort by `field`: flips the direction if it is already the active
    /// field, otherwise starts ascending.
    #[must_use]
    pub fn toggle_sort(self, field: SortField) -> Self {
        let order = if self.sort.field == Some(field) {
            self.sort.order.toggled()
        } else {
            SortOrder::Asc
        };
        self.with_sort(SortSpec::by(field, order))
    }

    /// Move to `page` if it lies within `1..=total_pages`; otherwise the
    /// selection is returned unchanged.
    #[must_use]
    pub fn go_to_page(self, page: u32, total_pages: u32) -> Self {
        if (1..=total_pages).contains(&page) {
            Self { page, ..self }
        } else {
            self
        }
    }

    /// Pull the current page back into `1..=total_pages`.
    #[must_use]
    pub fn clamp_page(self, total_pages: u32) -> Self {
        Self {
            page: self.page.clamp(1, total_pages.max(1)),
            ..self
        }
    }

    /// Build a selection from query parameters, defaulting anything missing
    /// or malformed.
    #[must_use]
    pub fn from_query(query: &SelectionQuery) -> Self {
        let field = query.sort.as_deref().and_then(SortField::parse);
        let order = match query.order.as_deref() {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        };
        let page = query
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|&p| p >= 1)
            .unwrap_or(1);

        Self {
            search: query.q.clone().unwrap_or_default(),
            category: query
                .category
                .as_deref()
                .map_or(CategoryFilter::All, CategoryFilter::from_label),
            sort: SortSpec { field, order },
            page,
        }
    }

    /// Query parameters that reproduce this selection, leaving out defaults.
    #[must_use]
    pub fn to_query(&self) -> SelectionQuery {
        SelectionQuery {
            q: Some(self.search.clone()).filter(|s| !s.is_empty()),
            category: match &self.category {
                CategoryFilter::All => None,
                CategoryFilter::Only(label) => Some(label.clone()),
            },
            sort: self.sort.field.map(|f| f.as_str().to_string()),
            order: self
                .sort
                .field
                .and(Some(self.sort.order))
                .filter(|o| *o == SortOrder::Desc)
                .map(|o| o.as_str().to_string()),
            page: Some(self.page).filter(|&p| p > 1).map(|p| p.to_string()),
        }
    }
}
