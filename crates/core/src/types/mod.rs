//! Core types for Asseto.
//!
//! Type-safe wrappers for identifiers, account emails and display currency.

pub mod currency;
pub mod email;
pub mod id;

pub use currency::{CurrencyCode, UnknownCurrency};
pub use email::{Email, EmailError};
pub use id::*;
