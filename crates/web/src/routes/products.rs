//! Product form and mutation route handlers.
//!
//! Every mutation ends in a redirect to the inventory listing; failures are
//! returned as `AppError` responses.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use asseto_core::{Product, ProductInput, Settings};

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::Layout;
use crate::services::ProductService;
use crate::state::AppState;

/// Where successful mutations land.
const AFTER_MUTATION: &str = "/inventory";

#[derive(Debug, Deserialize)]
pub struct FormQuery {
    pub edit: Option<String>,
}

/// Values shown in the add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFormView {
    /// Set when editing; the form then posts to `/products/update`.
    pub product_id: Option<String>,
    pub name: String,
    pub sku: String,
    pub price: String,
    pub quantity: String,
    pub low_stock_at: String,
}

impl ProductFormView {
    /// Empty create form with the configured default threshold.
    fn blank(settings: &Settings) -> Self {
        Self {
            low_stock_at: settings.default_low_stock_threshold.to_string(),
            ..Self::default()
        }
    }

    fn editing(product: &Product) -> Self {
        Self {
            product_id: Some(product.id.to_string()),
            name: product.name.clone(),
            sku: product.sku.clone().unwrap_or_default(),
            price: product.price.round_dp(2).to_string(),
            quantity: product.quantity.to_string(),
            low_stock_at: product
                .low_stock_at
                .map(|t| t.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Add/edit product template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub layout: Layout,
    pub form: ProductFormView,
    pub currency_symbol: &'static str,
}

/// Display the create form, or the edit form for an owned product.
///
/// An unknown, malformed or foreign `edit` id falls back to the create form.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn form(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<FormQuery>,
) -> Result<impl IntoResponse> {
    let settings = state.settings().current().await;

    let editing = match query.edit.as_deref().filter(|id| !id.trim().is_empty()) {
        Some(raw_id) => {
            ProductService::new(state.pool())
                .find_for_edit(user.id, raw_id)
                .await?
        }
        None => None,
    };
    let form = editing
        .as_ref()
        .map_or_else(|| ProductFormView::blank(&settings), ProductFormView::editing);

    Ok(ProductFormTemplate {
        layout: Layout::new(&settings, Some(&user), "add-product"),
        form,
        currency_symbol: settings.currency.symbol(),
    })
}

/// Create a product.
#[instrument(skip(state, user, input), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(input): Form<ProductInput>,
) -> Result<Redirect> {
    ProductService::new(state.pool())
        .create(user.id, &input)
        .await?;
    Ok(Redirect::to(AFTER_MUTATION))
}

/// Apply a partial update to a product.
#[instrument(skip(state, user, input), fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(input): Form<ProductInput>,
) -> Result<Redirect> {
    ProductService::new(state.pool())
        .update(user.id, &input)
        .await?;
    Ok(Redirect::to(AFTER_MUTATION))
}

/// Delete a product.
#[instrument(skip(state, user, input), fields(user_id = %user.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(input): Form<ProductInput>,
) -> Result<Redirect> {
    ProductService::new(state.pool())
        .delete(user.id, &input)
        .await?;
    Ok(Redirect::to(AFTER_MUTATION))
}

#[cfg(test)]
mod tests {
    use asseto_core::{ProductId, UserId};
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_blank_form_prefills_default_threshold() {
        let settings = Settings {
            default_low_stock_threshold: 12,
            ..Settings::default()
        };
        let form = ProductFormView::blank(&settings);
        assert_eq!(form.low_stock_at, "12");
        assert!(form.product_id.is_none());
        assert!(form.name.is_empty());
    }

    #[test]
    fn test_edit_form_shows_current_values() {
        let product = Product {
            id: ProductId::generate(),
            user_id: UserId::generate(),
            name: "Cable".to_string(),
            sku: None,
            price: Decimal::new(450, 2),
            quantity: 7,
            low_stock_at: None,
            created_at: Utc::now(),
        };

        let form = ProductFormView::editing(&product);
        assert_eq!(form.product_id, Some(product.id.to_string()));
        assert_eq!(form.price, "4.50");
        assert_eq!(form.quantity, "7");
        assert_eq!(form.sku, "");
        assert_eq!(form.low_stock_at, "");
    }
}
