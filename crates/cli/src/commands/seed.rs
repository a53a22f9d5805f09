//! Demo data for a fresh account.
//!
//! Products are named `Product 1..N`, priced 0 to 100, stocked 0 to 19 units
//! and created five days apart going back from now, so the dashboard
//! histogram has something to show.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use asseto_core::{Email, NewProduct};
use asseto_web::db::{ProductRepository, UserRepository};

/// Products inserted when no count is given.
pub const DEFAULT_COUNT: u32 = 10;

/// Threshold given to every demo product.
const DEMO_LOW_STOCK_AT: i32 = 5;

/// Days between consecutive demo products.
const SPACING_DAYS: i64 = 5;

/// Build `count` demo products with their creation times, newest first.
pub fn demo_products(
    rng: &mut impl Rng,
    count: u32,
    now: DateTime<Utc>,
) -> Vec<(NewProduct, DateTime<Utc>)> {
    (0..count)
        .map(|i| {
            let product = NewProduct {
                name: format!("Product {}", i + 1),
                sku: None,
                price: Decimal::new(rng.random_range(0..=10_000), 2),
                quantity: rng.random_range(0..20),
                low_stock_at: Some(DEMO_LOW_STOCK_AT),
            };
            let created_at = now - Duration::days(i64::from(i) * SPACING_DAYS);
            (product, created_at)
        })
        .collect()
}

/// Insert demo products owned by the account with `email`.
///
/// # Errors
///
/// Returns an error if the email is invalid, no such account exists, or an
/// insert fails.
pub async fn run(email: &str, count: u32) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email)?;
    let pool = super::connect().await?;

    let user = UserRepository::new(&pool)
        .get_by_email(&email)
        .await?
        .ok_or_else(|| format!("No user with email {email}"))?;

    let products = ProductRepository::new(&pool);
    let demo = demo_products(&mut rand::rng(), count, Utc::now());
    for (product, created_at) in &demo {
        products.create_at(user.id, product, *created_at).await?;
    }

    tracing::info!(user_id = %user.id, count = demo.len(), "Seeded demo products");
    Ok(())
}
