//! Account model.

use chrono::{DateTime, Utc};

use asseto_core::{Email, UserId};

/// A registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}
