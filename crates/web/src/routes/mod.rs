//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page
//!
//! # Inventory (requires auth)
//! GET  /dashboard              - Metrics, recent products and weekly histogram
//! GET  /inventory              - Searchable, paginated product listing
//! GET  /add-product            - Create form, or edit form with ?edit=<id>
//! POST /products               - Create product
//! POST /products/update        - Partial update
//! POST /products/delete        - Delete product
//!
//! # Settings (requires auth)
//! GET  /settings               - Settings form
//! POST /settings               - Save settings
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//! ```

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod home;
pub mod inventory;
pub mod products;
pub mod settings;

use axum::{
    Router,
    routing::{get, post},
};

use asseto_core::Settings;

use crate::models::CurrentUser;
use crate::state::AppState;

/// Page chrome shared by every template: header, sidebar and footer.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Shown in the header; falls back to the product name when empty.
    pub company_name: String,
    /// Sidebar account label; `None` hides the sidebar.
    pub user_label: Option<String>,
    /// Sidebar entry to highlight.
    pub active: &'static str,
}

impl Layout {
    #[must_use]
    pub fn new(settings: &Settings, user: Option<&CurrentUser>, active: &'static str) -> Self {
        let company_name = if settings.company_name.is_empty() {
            "Asseto".to_string()
        } else {
            settings.company_name.clone()
        };

        Self {
            company_name,
            user_label: user.map(|u| u.label().to_string()),
            active,
        }
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the product mutation routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(products::create))
        .route("/update", post(products::update))
        .route("/delete", post(products::delete))
}

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/dashboard", get(dashboard::show))
        .route("/inventory", get(inventory::index))
        .route("/add-product", get(products::form))
        .nest("/products", product_routes())
        .route("/settings", get(settings::show).post(settings::save))
        .nest("/auth", auth_routes())
}

#[cfg(test)]
mod tests {
    use asseto_core::UserId;

    use super::*;

    #[test]
    fn test_layout_falls_back_to_product_name() {
        let layout = Layout::new(&Settings::default(), None, "dashboard");
        assert_eq!(layout.company_name, "Asseto");
        assert!(layout.user_label.is_none());
    }

    #[test]
    fn test_layout_uses_company_and_user() {
        let settings = Settings {
            company_name: "Acme Supplies".to_string(),
            ..Settings::default()
        };
        let user = CurrentUser {
            id: UserId::generate(),
            email: "ops@acme.test".to_string(),
            display_name: String::new(),
        };

        let layout = Layout::new(&settings, Some(&user), "inventory");
        assert_eq!(layout.company_name, "Acme Supplies");
        assert_eq!(layout.user_label.as_deref(), Some("ops@acme.test"));
    }
}
