//! Inventory listing route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use asseto_core::{
    CurrencyCode, InventoryQuery, PAGE_SIZE_CHOICES, Pagination, Product, SearchTerm,
};

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::Layout;
use crate::services::ProductService;
use crate::state::AppState;

/// Raw listing parameters; parsing and clamping happen in `InventoryQuery`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryParams {
    pub q: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// One row of the inventory table.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub price: String,
    pub quantity: i32,
    pub low_stock_at: String,
    pub is_low: bool,
    pub fill_percent: u8,
    pub edit_href: String,
}

impl ProductRowView {
    fn new(product: &Product, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            sku: product.sku.clone().unwrap_or_default(),
            price: currency.format(product.price),
            quantity: product.quantity,
            low_stock_at: product
                .low_stock_at
                .map(|t| t.to_string())
                .unwrap_or_default(),
            is_low: product.is_low(),
            fill_percent: product.stock_fill_percent(),
            edit_href: format!("/add-product?edit={}", product.id),
        }
    }
}

/// A numbered page link.
#[derive(Debug, Clone)]
pub struct PageLinkView {
    pub number: u32,
    pub href: String,
    pub current: bool,
}

/// An entry in the page-size selector.
#[derive(Debug, Clone)]
pub struct PageSizeView {
    pub size: u32,
    pub selected: bool,
}

/// Builds listing links that keep the search term and page size.
struct LinkBuilder<'a> {
    search: Option<&'a str>,
    page_size: u32,
}

impl LinkBuilder<'_> {
    fn page(&self, page: u32) -> String {
        let mut href = format!("/inventory?page={page}&pageSize={}", self.page_size);
        if let Some(q) = self.search {
            href.push_str("&q=");
            href.push_str(&urlencoding::encode(q));
        }
        href
    }
}

/// Inventory listing template.
#[derive(Template, WebTemplate)]
#[template(path = "inventory/index.html")]
pub struct InventoryTemplate {
    pub layout: Layout,
    pub search: String,
    pub total_count: i64,
    pub total_quantity: i64,
    pub low_stock_count: i64,
    pub products: Vec<ProductRowView>,
    pub page: u32,
    pub total_pages: u32,
    pub first_row: i64,
    pub last_row: i64,
    pub pages: Vec<PageLinkView>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub page_sizes: Vec<PageSizeView>,
}

/// Display one page of the signed-in user's products.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<InventoryParams>,
) -> Result<impl IntoResponse> {
    let settings = state.settings().current().await;
    let query = InventoryQuery::from_params(
        params.q.as_deref(),
        params.page.as_deref(),
        params.page_size.as_deref(),
        settings.items_per_page,
    );

    let listing = ProductService::new(state.pool())
        .inventory(user.id, &query)
        .await?;
    let pagination = Pagination::new(&query, listing.summary.total_count);

    let links = LinkBuilder {
        search: query.search.as_ref().map(SearchTerm::as_str),
        page_size: query.page_size,
    };

    Ok(InventoryTemplate {
        layout: Layout::new(&settings, Some(&user), "inventory"),
        search: links.search.unwrap_or_default().to_string(),
        total_count: listing.summary.total_count,
        total_quantity: listing.summary.total_quantity,
        low_stock_count: listing.summary.low_stock_count,
        products: listing
            .products
            .iter()
            .map(|p| ProductRowView::new(p, settings.currency))
            .collect(),
        page: pagination.page,
        total_pages: pagination.total_pages,
        first_row: pagination.first_row(),
        last_row: pagination.last_row(),
        pages: pagination
            .window()
            .into_iter()
            .map(|number| PageLinkView {
                number,
                href: links.page(number),
                current: number == pagination.page,
            })
            .collect(),
        prev_href: pagination
            .has_prev()
            .then(|| links.page(pagination.prev_page())),
        next_href: pagination
            .has_next()
            .then(|| links.page(pagination.next_page())),
        page_sizes: PAGE_SIZE_CHOICES
            .iter()
            .map(|&size| PageSizeView {
                size,
                selected: size == query.page_size,
            })
            .collect(),
    })
}
