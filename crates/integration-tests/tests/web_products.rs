//! HTTP tests for product management.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (asseto migrate)
//! - The web server running (cargo run -p asseto-web)
//!
//! Run with: cargo test -p asseto-integration-tests --test web_products -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode, header::LOCATION, redirect::Policy};
use uuid::Uuid;

/// Base URL for the web server (configurable via environment).
fn base_url() -> String {
    std::env::var("ASSETO_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Client that keeps cookies and does not follow redirects.
fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Register a fresh account; the client is signed in afterwards.
async fn signed_in_client() -> Client {
    let client = client();
    let email = format!("it-{}@example.com", Uuid::new_v4());

    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .form(&[
            ("email", email.as_str()),
            ("display_name", "Integration"),
            ("password", "integration-pass"),
            ("password_confirm", "integration-pass"),
        ])
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");
    client
}

async fn create_product(client: &Client, fields: &[(&str, &str)]) -> reqwest::Response {
    client
        .post(format!("{}/products", base_url()))
        .form(fields)
        .send()
        .await
        .expect("Failed to create product")
}

async fn inventory_html(client: &Client, query: &str) -> String {
    let resp = client
        .get(format!("{}/inventory?{query}", base_url()))
        .send()
        .await
        .expect("Failed to load inventory");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.unwrap()
}

/// First product id linked from an inventory page.
fn first_product_id(html: &str) -> Option<String> {
    let marker = "/add-product?edit=";
    let start = html.find(marker)? + marker.len();
    html.get(start..start + 36).map(str::to_string)
}

// ============================================================================
// Access Control
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_pages_require_login() {
    let client = client();

    for path in ["/dashboard", "/inventory", "/add-product", "/settings"] {
        let resp = client
            .get(format!("{}{path}", base_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&resp), "/auth/login");
    }
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_wrong_password_is_rejected() {
    let resp = client()
        .post(format!("{}/auth/login", base_url()))
        .form(&[("email", "nobody@example.com"), ("password", "not-a-password")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth/login?error=credentials");
}

// ============================================================================
// Product Lifecycle
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_product_lifecycle() {
    let client = signed_in_client().await;
    let name = format!("Widget {}", Uuid::new_v4().simple());

    let resp = create_product(
        &client,
        &[
            ("name", name.as_str()),
            ("sku", "W-1"),
            ("price", "12.50"),
            ("quantity", "3"),
            ("lowStockAt", "5"),
        ],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/inventory");

    let html = inventory_html(&client, &format!("q={}", name.replace(' ', "+"))).await;
    assert!(html.contains(&name));
    let id = first_product_id(&html).expect("product link on page");

    // Partial update: only quantity changes
    let resp = client
        .post(format!("{}/products/update", base_url()))
        .form(&[("productId", id.as_str()), ("quantity", "42")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = client
        .get(format!("{}/add-product?edit={id}", base_url()))
        .send()
        .await
        .unwrap();
    let form = resp.text().await.unwrap();
    assert!(form.contains(&name));
    assert!(form.contains("value=\"42\""));
    assert!(form.contains("value=\"12.50\""));

    let resp = client
        .post(format!("{}/products/delete", base_url()))
        .form(&[("productId", id.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let html = inventory_html(&client, &format!("q={}", name.replace(' ', "+"))).await;
    assert!(!html.contains(&name));
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_create_without_name_is_bad_request() {
    let client = signed_in_client().await;

    let resp = create_product(&client, &[("price", "1.00")]).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_update_unknown_product_is_not_found() {
    let client = signed_in_client().await;

    let resp = client
        .post(format!("{}/products/update", base_url()))
        .form(&[("productId", Uuid::new_v4().to_string().as_str()), ("name", "x")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_other_user_cannot_delete() {
    let owner = signed_in_client().await;
    let intruder = signed_in_client().await;
    let name = format!("Guarded {}", Uuid::new_v4().simple());

    create_product(&owner, &[("name", name.as_str()), ("quantity", "1")]).await;
    let html = inventory_html(&owner, &format!("q={}", name.replace(' ', "+"))).await;
    let id = first_product_id(&html).expect("product link on page");

    let resp = intruder
        .post(format!("{}/products/delete", base_url()))
        .form(&[("productId", id.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Still there for the owner, invisible to the intruder
    let html = inventory_html(&owner, &format!("q={}", name.replace(' ', "+"))).await;
    assert!(html.contains(&name));
    let html = inventory_html(&intruder, &format!("q={}", name.replace(' ', "+"))).await;
    assert!(!html.contains(&name));
}

#[tokio::test]
#[ignore = "Requires running web server"]
async fn test_other_user_cannot_update() {
    let owner = signed_in_client().await;
    let intruder = signed_in_client().await;
    let name = format!("Locked {}", Uuid::new_v4().simple());

    create_product(&owner, &[("name", name.as_str()), ("quantity", "7")]).await;
    let html = inventory_html(&owner, &format!("q={}", name.replace(' ', "+"))).await;
    let id = first_product_id(&html).expect("product link on page");

    let resp = intruder
        .post(format!("{}/products/update", base_url()))
        .form(&[
            ("productId", id.as_str()),
            ("name", "Hijacked"),
            ("quantity", "0"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Owner still sees the original name and quantity
    let form = owner
        .get(format!("{}/add-product?edit={id}", base_url()))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(form.contains(&name));
    assert!(!form.contains("Hijacked"));
    assert!(form.contains("value=\"7\""));
}

// ============================================================================
// Settings
// ============================================================================

#[tokio::test]
#[ignore = "Requires running web server; overwrites the settings document"]
async fn test_settings_save() {
    let client = signed_in_client().await;

    let resp = client
        .post(format!("{}/settings", base_url()))
        .form(&[("companyName", "Integration Co")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .post(format!("{}/settings", base_url()))
        .form(&[
            ("companyName", "Integration Co"),
            ("currency", "EUR"),
            ("itemsPerPage", "10"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/settings?saved=1");

    let html = client
        .get(format!("{}/settings?saved=1", base_url()))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Settings saved."));
    assert!(html.contains("Integration Co"));
}
