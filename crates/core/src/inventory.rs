//! Inventory listing: query normalization, search terms and pagination.
//!
//! The aggregate figures are computed by the repository over the full
//! filtered set; this module only decides *what* is asked for and how the
//! answer is paged.

use serde::Serialize;

use crate::product::Product;

/// Smallest page size a request may ask for.
pub const MIN_PAGE_SIZE: u32 = 5;
/// Largest page size a request may ask for.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Page size used when neither the request nor the settings provide one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Page sizes offered by the page-size selector.
pub const PAGE_SIZE_CHOICES: [u32; 4] = [5, 10, 20, 50];

/// How many page links are shown on either side of the current page.
const PAGE_WINDOW_RADIUS: u32 = 2;

/// Case-insensitive substring matched against product name or SKU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Returns `None` for absent or blank input.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| Self(q.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ILIKE` pattern with `%`, `_` and `\` escaped so they match literally.
    #[must_use]
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }

    /// In-memory equivalent of the SQL filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.0.to_lowercase();
        product.name.to_lowercase().contains(&needle)
            || product
                .sku
                .as_deref()
                .is_some_and(|sku| sku.to_lowercase().contains(&needle))
    }
}

/// A normalized inventory listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryQuery {
    pub search: Option<SearchTerm>,
    /// 1-based page number, never below 1.
    pub page: u32,
    /// Rows per page, within `MIN_PAGE_SIZE..=MAX_PAGE_SIZE`.
    pub page_size: u32,
}

impl InventoryQuery {
    /// Build a query from raw request parameters.
    ///
    /// Unparseable or non-positive values fall back to defaults: page 1 and
    /// `default_page_size` (itself clamped). Any explicit page size is
    /// clamped to `[5, 100]`.
    #[must_use]
    pub fn from_params(
        q: Option<&str>,
        page: Option<&str>,
        page_size: Option<&str>,
        default_page_size: u32,
    ) -> Self {
        let page = parse_positive(page).unwrap_or(1);
        let page_size = parse_positive(page_size)
            .unwrap_or(default_page_size)
            .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);

        Self {
            search: SearchTerm::parse(q),
            page,
            page_size,
        }
    }

    /// Rows skipped before this page: `(page - 1) * page_size`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }

    /// Rows fetched for this page.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for InventoryQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
}

/// Aggregates over every row matching the owner and search filter,
/// independent of the requested page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub total_count: i64,
    pub total_quantity: i64,
    /// Rows with a threshold whose quantity is at or below it.
    pub low_stock_count: i64,
}

impl InventorySummary {
    /// Summarize an already filtered set of products.
    #[must_use]
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        products
            .into_iter()
            .fold(Self::default(), |mut summary, product| {
                summary.total_count += 1;
                summary.total_quantity += i64::from(product.quantity);
                if product.is_low() {
                    summary.low_stock_count += 1;
                }
                summary
            })
    }
}

/// Navigation state for a page of results.
///
/// Out-of-range pages are allowed; they simply have no rows and no "next".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

impl Pagination {
    #[must_use]
    pub fn new(query: &InventoryQuery, total_count: i64) -> Self {
        let page_size = query.page_size.max(1);
        let size = i64::from(page_size);
        let pages = (total_count.max(0) + size - 1) / size;
        let total_pages = u32::try_from(pages).unwrap_or(u32::MAX).max(1);

        Self {
            page: query.page.max(1),
            page_size,
            total_count,
            total_pages,
        }
    }

    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Previous page, clamped into the valid range.
    #[must_use]
    pub fn prev_page(&self) -> u32 {
        self.page.saturating_sub(1).clamp(1, self.total_pages)
    }

    /// Next page, clamped into the valid range.
    #[must_use]
    pub fn next_page(&self) -> u32 {
        self.page.saturating_add(1).min(self.total_pages)
    }

    /// Page numbers linked around the current page.
    #[must_use]
    pub fn window(&self) -> Vec<u32> {
        let start = self.page.saturating_sub(PAGE_WINDOW_RADIUS).max(1);
        let end = self
            .page
            .saturating_add(PAGE_WINDOW_RADIUS)
            .min(self.total_pages);
        (start..=end).collect()
    }

    /// 1-based index of the first row on this page, or 0 when it is empty.
    #[must_use]
    pub fn first_row(&self) -> i64 {
        let offset = i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size);
        if offset < self.total_count {
            offset + 1
        } else {
            0
        }
    }

    /// 1-based index of the last row on this page, or 0 when it is empty.
    #[must_use]
    pub fn last_row(&self) -> i64 {
        let end = i64::from(self.page) * i64::from(self.page_size);
        if self.first_row() == 0 {
            0
        } else {
            end.min(self.total_count)
        }
    }
}
