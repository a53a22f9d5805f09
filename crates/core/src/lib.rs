//! Asseto Core - Domain types and inventory logic.
//!
//! This crate provides everything the Asseto binaries share:
//! - `web` - Server-rendered inventory application
//! - `cli` - Migrations, user management and demo data
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. Callers fetch rows and hand them in; the
//! functions here validate input and derive view data.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, account emails and display currency
//! - [`product`] - Product model and validated create/update commands
//! - [`inventory`] - Listing query normalization, search and pagination
//! - [`dashboard`] - Stock value, stock-band percentages and weekly history
//! - [`settings`] - Settings document and settings form validation
//! - [`error`] - Domain error kinds

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod dashboard;
pub mod error;
pub mod inventory;
pub mod product;
pub mod settings;
pub mod types;

pub use dashboard::{DashboardMetrics, WeekBucket};
pub use error::DomainError;
pub use inventory::{
    InventoryQuery, InventorySummary, PAGE_SIZE_CHOICES, Pagination, SearchTerm,
};
pub use product::{NewProduct, Product, ProductInput, ProductPatch, StockLevel};
pub use settings::{Settings, SettingsInput};
pub use types::*;
