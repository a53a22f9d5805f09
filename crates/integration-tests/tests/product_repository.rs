//! Repository tests against a real database.
//!
//! These tests require a scratch `PostgreSQL` database named by
//! `ASSETO_TEST_DATABASE_URL`. Migrations are applied on first use and every
//! test works inside its own freshly created user, so runs do not interfere.

#![allow(clippy::unwrap_used)]

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

use asseto_core::{
    DomainError, Email, InventoryQuery, NewProduct, ProductId, ProductInput, SearchTerm, UserId,
};
use asseto_web::db::{ProductRepository, RepositoryError, UserRepository, create_pool};
use asseto_web::services::{ProductError, ProductService};

async fn pool() -> PgPool {
    let url = std::env::var("ASSETO_TEST_DATABASE_URL")
        .expect("ASSETO_TEST_DATABASE_URL must be set");
    let pool = create_pool(&SecretString::from(url)).await.unwrap();
    sqlx::migrate!("../web/migrations").run(&pool).await.unwrap();
    pool
}

async fn fresh_user(pool: &PgPool) -> UserId {
    let email = Email::parse(&format!("repo-{}@example.com", Uuid::new_v4())).unwrap();
    UserRepository::new(pool)
        .create(&email, "Repo", "not-a-real-hash")
        .await
        .unwrap()
        .id
}

fn product(name: &str, sku: Option<&str>, quantity: i32, low_stock_at: Option<i32>) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        sku: sku.map(str::to_string),
        price: Decimal::new(250, 2),
        quantity,
        low_stock_at,
    }
}

#[tokio::test]
#[ignore = "Requires ASSETO_TEST_DATABASE_URL"]
async fn test_duplicate_email_conflicts() {
    let pool = pool().await;
    let users = UserRepository::new(&pool);
    let email = Email::parse(&format!("dup-{}@example.com", Uuid::new_v4())).unwrap();

    users.create(&email, "", "hash").await.unwrap();
    let err = users.create(&email, "", "hash").await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));
}

#[tokio::test]
#[ignore = "Requires ASSETO_TEST_DATABASE_URL"]
async fn test_summary_covers_filtered_set_not_page() {
    let pool = pool().await;
    let user = fresh_user(&pool).await;
    let other = fresh_user(&pool).await;
    let repo = ProductRepository::new(&pool);

    repo.create(user, &product("Blue Cable", Some("CBL-1"), 2, Some(5)))
        .await
        .unwrap();
    repo.create(user, &product("Red Cable", None, 10, Some(5)))
        .await
        .unwrap();
    repo.create(user, &product("Adapter", Some("cable-x"), 0, None))
        .await
        .unwrap();
    repo.create(other, &product("Other Cable", None, 99, Some(1)))
        .await
        .unwrap();

    let all = repo.summary(user, None).await.unwrap();
    assert_eq!(all.total_count, 3);
    assert_eq!(all.total_quantity, 12);
    assert_eq!(all.low_stock_count, 1);

    // Name or SKU, case-insensitive, owner only
    let search = SearchTerm::parse(Some("CABLE"));
    let filtered = repo.summary(user, search.as_ref()).await.unwrap();
    assert_eq!(filtered.total_count, 3);

    let query = InventoryQuery::from_params(Some("cable"), Some("1"), Some("5"), 20);
    let page = repo.page(user, &query).await.unwrap();
    assert_eq!(page.len(), 3);
    assert!(page.iter().all(|p| p.user_id == user));
}

#[tokio::test]
#[ignore = "Requires ASSETO_TEST_DATABASE_URL"]
async fn test_search_wildcards_are_literal() {
    let pool = pool().await;
    let user = fresh_user(&pool).await;
    let repo = ProductRepository::new(&pool);

    repo.create(user, &product("100% Cotton", None, 1, None))
        .await
        .unwrap();
    repo.create(user, &product("1000 Cotton", None, 1, None))
        .await
        .unwrap();

    let search = SearchTerm::parse(Some("100%"));
    let summary = repo.summary(user, search.as_ref()).await.unwrap();
    assert_eq!(summary.total_count, 1);
}

#[tokio::test]
#[ignore = "Requires ASSETO_TEST_DATABASE_URL"]
async fn test_pages_are_newest_first_and_out_of_range_is_empty() {
    let pool = pool().await;
    let user = fresh_user(&pool).await;
    let repo = ProductRepository::new(&pool);
    let now = Utc::now();

    for i in 0..7 {
        repo.create_at(
            user,
            &product(&format!("Item {i}"), None, i, None),
            now - Duration::days(i64::from(i)),
        )
        .await
        .unwrap();
    }

    let first = InventoryQuery::from_params(None, Some("1"), Some("5"), 20);
    let page = repo.page(user, &first).await.unwrap();
    assert_eq!(page.len(), 5);
    assert_eq!(page[0].name, "Item 0");

    let second = InventoryQuery::from_params(None, Some("2"), Some("5"), 20);
    assert_eq!(repo.page(user, &second).await.unwrap().len(), 2);

    let beyond = InventoryQuery::from_params(None, Some("9"), Some("5"), 20);
    assert!(repo.page(user, &beyond).await.unwrap().is_empty());
    assert_eq!(repo.summary(user, None).await.unwrap().total_count, 7);
}

#[tokio::test]
#[ignore = "Requires ASSETO_TEST_DATABASE_URL"]
async fn test_writes_are_owner_guarded() {
    let pool = pool().await;
    let owner = fresh_user(&pool).await;
    let intruder = fresh_user(&pool).await;
    let repo = ProductRepository::new(&pool);

    let created = repo
        .create(owner, &product("Guarded", None, 4, Some(2)))
        .await
        .unwrap();

    let err = repo.delete(created.id, intruder).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));

    let mut hijacked = created.clone();
    hijacked.user_id = intruder;
    hijacked.quantity = 0;
    assert!(matches!(
        repo.update(&hijacked).await.unwrap_err(),
        RepositoryError::NotFound
    ));

    let stored = repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 4);

    repo.delete(created.id, owner).await.unwrap();
    assert!(repo.get(created.id).await.unwrap().is_none());
    assert!(repo.get(ProductId::generate()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "Requires ASSETO_TEST_DATABASE_URL"]
async fn test_service_rejects_update_by_other_user() {
    let pool = pool().await;
    let owner = fresh_user(&pool).await;
    let intruder = fresh_user(&pool).await;
    let repo = ProductRepository::new(&pool);
    let service = ProductService::new(&pool);

    let created = repo
        .create(owner, &product("Owned", Some("OWN-1"), 7, Some(3)))
        .await
        .unwrap();

    let input = ProductInput {
        product_id: Some(created.id.to_string()),
        name: Some("Hijacked".to_string()),
        quantity: Some("0".to_string()),
        ..ProductInput::default()
    };
    let err = service.update(intruder, &input).await.unwrap_err();
    assert!(matches!(
        err,
        ProductError::Domain(DomainError::Unauthorized)
    ));

    let stored = repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Owned");
    assert_eq!(stored.quantity, 7);

    let updated = service.update(owner, &input).await.unwrap();
    assert_eq!(updated.name, "Hijacked");
    assert_eq!(updated.quantity, 0);
}
