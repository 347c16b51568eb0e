//! Product route handlers.

use std::time::Duration;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header::CACHE_CONTROL},
    response::{IntoResponse, Response},
};
use catalog_core::Product;
use catalog_core::listing::{self, Selection, SelectionQuery, SortField, SortOrder};
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::filters;
use crate::pages::{DetailOutcome, MISSING_ID_ERROR};
use crate::state::AppState;

/// Card display data for the listing grid.
#[derive(Clone)]
pub struct CardView {
    pub href: String,
    pub title: String,
    pub category: String,
    pub price: String,
    pub image: Option<String>,
}

/// Product display data for the detail page.
#[derive(Clone)]
pub struct ProductView {
    pub title: String,
    pub category: String,
    pub price: String,
    pub description: String,
    pub image: Option<String>,
    pub rating: String,
    pub reviews: u32,
}

/// One entry in the category dropdown.
pub struct CategoryOption {
    /// Raw label submitted as `category`.
    pub value: String,
    /// Text shown for the option.
    pub label: String,
    pub selected: bool,
}

impl CategoryOption {
    fn new(value: &str, selected: &str) -> Self {
        Self {
            value: value.to_string(),
            label: or_placeholder(value, "Uncategorized"),
            selected: value == selected,
        }
    }
}

/// A sort control; following `href` toggles or selects the field.
pub struct SortButton {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
    /// `▲`, `▼`, or empty for an inactive field.
    pub indicator: &'static str,
}

/// A numbered pagination link.
pub struct PageLink {
    pub number: u32,
    pub href: String,
    pub current: bool,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ListingTemplate {
    pub products: Vec<CardView>,
    pub error: Option<String>,
    pub search: String,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub categories: Vec<CategoryOption>,
    pub sort_buttons: Vec<SortButton>,
    pub matched: usize,
    pub current_page: u32,
    pub total_pages: u32,
    pub pages: Vec<PageLink>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct DetailTemplate {
    pub product: Option<ProductView>,
    pub error: Option<String>,
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

impl From<&Product> for CardView {
    fn from(product: &Product) -> Self {
        Self {
            href: format!("/products/{}", product.id),
            title: or_placeholder(&product.title, "Untitled Product"),
            category: or_placeholder(&product.category, "Uncategorized"),
            price: product.price.to_string(),
            image: product.image.clone(),
        }
    }
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            title: or_placeholder(&product.title, "Untitled Product"),
            category: or_placeholder(&product.category, "Uncategorized"),
            price: product.price.to_string(),
            description: product.description.clone(),
            image: product.image.clone(),
            rating: format!("{:.1}", product.rating.rate),
            reviews: product.rating.count,
        }
    }
}

/// Link to the listing for `selection`, omitting default parameters.
fn listing_href(selection: &Selection) -> String {
    let query = selection.to_query();
    let params: Vec<String> = [
        ("q", query.q),
        ("category", query.category),
        ("sort", query.sort),
        ("order", query.order),
        ("page", query.page),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.map(|v| format!("{key}={}", urlencoding::encode(&v))))
    .collect();

    if params.is_empty() {
        "/products".to_string()
    } else {
        format!("/products?{}", params.join("&"))
    }
}

fn sort_buttons(selection: &Selection) -> Vec<SortButton> {
    let sort = selection.sort();

    [(SortField::Price, "Price"), (SortField::Title, "Title")]
        .into_iter()
        .map(|(field, label)| {
            let active = sort.field == Some(field);
            let indicator = match (active, sort.order) {
                (false, _) => "",
                (true, SortOrder::Asc) => "▲",
                (true, SortOrder::Desc) => "▼",
            };
            SortButton {
                label,
                href: listing_href(&selection.clone().toggle_sort(field)),
                active,
                indicator,
            }
        })
        .collect()
}

fn page_links(selection: &Selection, total_pages: u32) -> Vec<PageLink> {
    (1..=total_pages)
        .map(|number| PageLink {
            number,
            href: listing_href(&selection.clone().go_to_page(number, total_pages)),
            current: number == selection.page(),
        })
        .collect()
}

/// `Cache-Control` for a generated page with revalidation hint `revalidate`.
fn cache_control(revalidate: Duration) -> String {
    format!(
        "public, max-age=0, s-maxage={}, stale-while-revalidate",
        revalidate.as_secs()
    )
}

/// Display the product listing page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Response {
    let page = state.pages().listing().await;
    let props = &page.data.props;

    let selection = Selection::from_query(&query);
    let refined = listing::refine(&props.products, &selection);
    let total_pages = listing::total_pages(refined.len());
    let selection = selection.clamp_page(total_pages);
    let visible = listing::paginate(&refined, selection.page());

    let current_page = selection.page();
    let step = |target: u32| {
        let moved = selection.clone().go_to_page(target, total_pages);
        (moved.page() != current_page).then(|| listing_href(&moved))
    };
    let prev_href = current_page.checked_sub(1).and_then(step);
    let next_href = step(current_page.saturating_add(1));

    let category = selection.category().label();
    let query = selection.to_query();

    let template = ListingTemplate {
        products: visible.iter().map(|p| CardView::from(*p)).collect(),
        error: props.error.clone(),
        search: selection.search().to_string(),
        sort: query.sort,
        order: query.order,
        categories: props
            .categories
            .iter()
            .map(|value| CategoryOption::new(value, category))
            .collect(),
        sort_buttons: sort_buttons(&selection),
        matched: refined.len(),
        current_page,
        total_pages,
        pages: page_links(&selection, total_pages),
        prev_href,
        next_href,
    };

    ([(CACHE_CONTROL, cache_control(page.data.revalidate))], template).into_response()
}

/// Status for a detail page outcome.
///
/// A route without an ID is as absent as an unknown product; only an
/// upstream failure is a 502.
fn detail_status(outcome: DetailOutcome<'_>) -> StatusCode {
    match outcome {
        DetailOutcome::Found(_) => StatusCode::OK,
        DetailOutcome::NotFound => StatusCode::NOT_FOUND,
        DetailOutcome::Error(message) if message == MISSING_ID_ERROR => StatusCode::NOT_FOUND,
        DetailOutcome::Error(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Display the product detail page.
///
/// 200 when found, 404 when the product does not exist, 502 when the
/// upstream failed.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    add_breadcrumb(
        "navigation",
        "Viewed product page",
        Some(&[("product_id", id.as_str())]),
    );

    let page = state.pages().detail(&id).await;
    let cache = [(CACHE_CONTROL, cache_control(page.data.revalidate))];

    let outcome = page.data.props.outcome();
    let template = match outcome {
        DetailOutcome::Found(product) => DetailTemplate {
            product: Some(ProductView::from(product)),
            error: None,
        },
        DetailOutcome::NotFound => DetailTemplate {
            product: None,
            error: None,
        },
        DetailOutcome::Error(message) => DetailTemplate {
            product: None,
            error: Some(message.to_string()),
        },
    };

    (detail_status(outcome), cache, template).into_response()
}
