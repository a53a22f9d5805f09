//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use asseto_core::{CurrencyCode, DashboardMetrics, Product, StockLevel, WeekBucket};

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::Layout;
use crate::services::ProductService;
use crate::state::AppState;

/// Number of recently added products listed under the metrics.
const RECENT_PRODUCTS: usize = 5;

/// Drawing height of the weekly histogram, in SVG units.
const CHART_HEIGHT: i64 = 160;
/// Horizontal space per histogram bar, in SVG units.
const CHART_SLOT: usize = 40;

/// Recently added product row.
#[derive(Debug, Clone)]
pub struct RecentProductView {
    pub name: String,
    pub sku: String,
    pub quantity: i32,
    pub price: String,
    pub level: &'static str,
    /// CSS modifier for the stock badge.
    pub badge: &'static str,
    pub edit_href: String,
}

impl RecentProductView {
    fn new(product: &Product, currency: CurrencyCode) -> Self {
        let level = product.stock_level();
        Self {
            name: product.name.clone(),
            sku: product.sku.clone().unwrap_or_default(),
            quantity: product.quantity,
            price: currency.format(product.price),
            level: level.label(),
            badge: match level {
                StockLevel::OutOfStock => "out",
                StockLevel::Low => "low",
                StockLevel::InStock => "ok",
            },
            edit_href: format!("/add-product?edit={}", product.id),
        }
    }
}

/// One bar of the weekly units histogram.
#[derive(Debug, Clone)]
pub struct WeekBarView {
    pub label: String,
    pub units: i64,
    pub x: usize,
    pub y: i64,
    pub height: i64,
}

fn week_bars(weeks: &[WeekBucket]) -> Vec<WeekBarView> {
    let max_units = weeks.iter().map(|w| w.units).max().unwrap_or(0).max(1);

    weeks
        .iter()
        .enumerate()
        .map(|(i, week)| {
            let height = week.units * CHART_HEIGHT / max_units;
            WeekBarView {
                label: week.label(),
                units: week.units,
                x: i * CHART_SLOT,
                y: CHART_HEIGHT - height,
                height,
            }
        })
        .collect()
}

/// Share of one stock band in the distribution bar.
#[derive(Debug, Clone)]
pub struct BandView {
    pub label: &'static str,
    pub class: &'static str,
    pub percent: String,
    /// Offset and width inside a 100-unit wide SVG.
    pub x: String,
    pub width: String,
}

fn bands(metrics: &DashboardMetrics) -> Vec<BandView> {
    let shares = [
        ("In stock", "ok", metrics.percentages.in_stock),
        ("Low stock", "low", metrics.percentages.low_stock),
        ("Out of stock", "out", metrics.percentages.out_of_stock),
    ];

    let mut offset = 0.0;
    shares
        .into_iter()
        .map(|(label, class, percent)| {
            let band = BandView {
                label,
                class,
                percent: format!("{percent:.1}%"),
                x: format!("{offset:.2}"),
                width: format!("{percent:.2}"),
            };
            offset += percent;
            band
        })
        .collect()
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub total_products: usize,
    pub total_value: String,
    pub total_units: i64,
    pub low_stock_products: usize,
    pub bands: Vec<BandView>,
    pub recent: Vec<RecentProductView>,
    pub weeks: Vec<WeekBarView>,
    pub chart_width: usize,
    pub chart_height: i64,
}

/// Display the dashboard for the signed-in user.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let settings = state.settings().current().await;
    let (metrics, recent) = ProductService::new(state.pool())
        .dashboard(user.id, RECENT_PRODUCTS)
        .await?;

    let currency = settings.currency;
    let weeks = week_bars(&metrics.weekly_units);

    Ok(DashboardTemplate {
        layout: Layout::new(&settings, Some(&user), "dashboard"),
        total_products: metrics.total_products,
        total_value: currency.format(metrics.total_value),
        total_units: metrics.total_units,
        low_stock_products: metrics.low_stock_products,
        bands: bands(&metrics),
        recent: recent
            .iter()
            .map(|p| RecentProductView::new(p, currency))
            .collect(),
        chart_width: weeks.len() * CHART_SLOT,
        chart_height: CHART_HEIGHT,
        weeks,
    })
}
