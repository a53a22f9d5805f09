//! Domain models for the web application.

pub mod session;
pub mod user;

pub use session::{CurrentUser, session_keys};
pub use user::User;
