//! Session-related models.

use serde::{Deserialize, Serialize};

use asseto_core::UserId;

use super::User;

/// Session keys used to store data in the session.
pub mod session_keys {
    /// Key for storing the currently signed-in user.
    pub const CURRENT_USER: &str = "current_user";
}

/// The signed-in user as stored in the session.
///
/// Resolved once per request by the auth extractors; every product query is
/// scoped by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.to_string(),
            display_name: user.display_name.clone(),
        }
    }
}

impl CurrentUser {
    /// Name shown in the sidebar; the email when no display name was given.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.email
        } else {
            &self.display_name
        }
    }
}
