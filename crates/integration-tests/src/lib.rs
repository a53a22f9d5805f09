//! Integration tests for Asseto.
//!
//! # Running Tests
//!
//! ```bash
//! # Against a running server
//! cargo run -p asseto-web &
//! cargo test -p asseto-integration-tests --test web_products -- --ignored
//!
//! # Against a scratch database
//! ASSETO_TEST_DATABASE_URL=postgres://localhost/asseto_test \
//!     cargo test -p asseto-integration-tests --test product_repository -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `web_products` - HTTP flows: sign-up, product CRUD, ownership, settings
//! - `product_repository` - Owner-scoped queries, search and pagination
