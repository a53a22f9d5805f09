//! Settings route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use asseto_core::{CurrencyCode, Settings, SettingsInput};

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::routes::Layout;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SavedQuery {
    pub saved: Option<String>,
}

/// An entry in the currency selector.
#[derive(Debug, Clone)]
pub struct CurrencyOptionView {
    pub code: &'static str,
    pub label: String,
    pub selected: bool,
}

fn currency_options(selected: CurrencyCode) -> Vec<CurrencyOptionView> {
    CurrencyCode::ALL
        .iter()
        .map(|&currency| CurrencyOptionView {
            code: currency.code(),
            label: format!("{} ({})", currency.code(), currency.symbol()),
            selected: currency == selected,
        })
        .collect()
}

/// Settings template.
#[derive(Template, WebTemplate)]
#[template(path = "settings/index.html")]
pub struct SettingsTemplate {
    pub layout: Layout,
    pub settings: Settings,
    pub currencies: Vec<CurrencyOptionView>,
    pub updated_at: Option<String>,
    pub saved: bool,
}

/// Display the settings form, pre-filled from the store or defaults.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<SavedQuery>,
) -> impl IntoResponse {
    let settings = state.settings().current().await;

    SettingsTemplate {
        layout: Layout::new(&settings, Some(&user), "settings"),
        currencies: currency_options(settings.currency),
        updated_at: settings
            .updated_at
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string()),
        saved: query.saved.as_deref() == Some("1"),
        settings,
    }
}

/// Validate and overwrite the settings document.
#[instrument(skip(state, user, input), fields(user_id = %user.id))]
pub async fn save(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(input): Form<SettingsInput>,
) -> Result<Redirect> {
    state.settings().save(&input).await?;
    Ok(Redirect::to("/settings?saved=1"))
}
