//! Business services for the web application.
//!
//! Services own the rules; route handlers only translate HTTP to calls and
//! outcomes to responses.

pub mod auth;
pub mod products;
pub mod settings;

pub use auth::{AuthError, AuthService};
pub use products::{InventoryPage, ProductError, ProductService};
pub use settings::{SettingsError, SettingsStore};
