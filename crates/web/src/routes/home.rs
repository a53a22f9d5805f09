//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::Layout;
use crate::state::AppState;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    /// "Get started" target: the dashboard when signed in, else login.
    pub start_href: &'static str,
}

/// Display the landing page.
#[instrument(skip(state, user))]
pub async fn home(State(state): State<AppState>, OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    let settings = state.settings().current().await;
    let start_href = if user.is_some() {
        "/dashboard"
    } else {
        "/auth/login"
    };

    HomeTemplate {
        layout: Layout::new(&settings, user.as_ref(), "home"),
        start_href,
    }
}
