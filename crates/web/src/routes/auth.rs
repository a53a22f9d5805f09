//! Authentication route handlers.
//!
//! Failures redirect back to the form with a short `?error=` code so a
//! refresh never resubmits credentials.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::routes::Layout;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub display_name: Option<String>,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub error: Option<&'static str>,
}

/// Human-readable message for an `?error=` code.
fn error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password.",
        "invalid_email" => "Please enter a valid email address.",
        "email_taken" => "An account with this email already exists.",
        "password_too_short" => "Password must be at least 8 characters.",
        "password_mismatch" => "Passwords do not match.",
        "session" => "Could not start your session. Please try again.",
        _ => "Something went wrong. Please try again.",
    }
}

/// Human-readable message for a `?success=` code.
fn success_message(code: &str) -> Option<&'static str> {
    match code {
        "logged_out" => Some("You have been signed out."),
        _ => None,
    }
}

// =============================================================================
// Login
// =============================================================================

/// Display the login page, or skip it when already signed in.
pub async fn login_page(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if user.is_some() {
        return Redirect::to("/dashboard").into_response();
    }

    let settings = state.settings().current().await;
    LoginTemplate {
        layout: Layout::new(&settings, None, "login"),
        error: query.error.as_deref().map(error_message),
        success: query.success.as_deref().and_then(success_message),
    }
    .into_response()
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => start_session(&session, &user, "/dashboard").await,
        Err(e @ AuthError::InvalidCredentials) => {
            tracing::warn!(error = %e, "Login failed");
            Redirect::to("/auth/login?error=credentials").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Login error");
            Redirect::to(&format!("/auth/login?error={}", e.code())).into_response()
        }
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let settings = state.settings().current().await;
    RegisterTemplate {
        layout: Layout::new(&settings, None, "register"),
        error: query.error.as_deref().map(error_message),
    }
}

/// Handle registration form submission and sign the new user in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch").into_response();
    }

    match AuthService::new(state.pool())
        .register(
            &form.email,
            form.display_name.as_deref().unwrap_or_default(),
            &form.password,
        )
        .await
    {
        Ok(user) => start_session(&session, &user, "/dashboard").await,
        Err(e) => {
            if matches!(e, AuthError::Repository(_) | AuthError::PasswordHash) {
                tracing::error!(error = %e, "Registration error");
            } else {
                tracing::warn!(error = %e, "Registration rejected");
            }
            Redirect::to(&format!("/auth/register?error={}", e.code())).into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!(error = %e, "Failed to clear session");
    }
    clear_sentry_user();

    Redirect::to("/auth/login?success=logged_out").into_response()
}

async fn start_session(session: &Session, user: &User, destination: &str) -> Response {
    let current_user = CurrentUser::from(user);

    if let Err(e) = set_current_user(session, &current_user).await {
        tracing::error!(error = %e, "Failed to set session");
        return Redirect::to("/auth/login?error=session").into_response();
    }
    set_sentry_user(&current_user.id, Some(&current_user.email));

    tracing::info!(user_id = %current_user.id, "User signed in");
    Redirect::to(destination).into_response()
}
