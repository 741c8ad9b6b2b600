//! End-to-end API tests for Velour.
//!
//! These tests drive a real running server over HTTP and reach into the
//! database directly for fixture setup (marking emails verified, cleanup).
//! They are `#[ignore]`d by default; run them against a local stack:
//!
//! ```bash
//! # Start Postgres, run migrations, create an admin, start the server
//! cargo run -p velour-cli -- migrate
//! cargo run -p velour-cli -- admin create --email admin@velour.test --name Admin --password hunter2secret
//! cargo run -p velour-api
//!
//! # Run the suite
//! VELOUR_ADMIN_EMAIL=admin@velour.test VELOUR_ADMIN_PASSWORD=hunter2secret \
//!     cargo test -p velour-integration-tests -- --ignored
//! ```
//!
//! Configuration (all optional except admin credentials):
//! - `VELOUR_API_URL` - server base URL, default `http://localhost:4000`
//! - `DATABASE_URL` - Postgres connection for fixture setup
//! - `VELOUR_ADMIN_EMAIL` / `VELOUR_ADMIN_PASSWORD` - admin login for tests
//!   that exercise the admin surface

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use reqwest::Client;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

use velour_core::ProductId;

/// Base URL of the API under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("VELOUR_API_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

/// Plain HTTP client. Auth is header-based, so no cookie store needed.
#[must_use]
pub fn client() -> Client {
    Client::new()
}

/// A unique email address so tests never collide on unique constraints.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@velour.test", Uuid::new_v4().simple())
}

/// Connect to the test database for fixture setup.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for fixture setup");
    velour_api::db::create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to test database")
}

/// Login response body shared by user and admin login.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Register an account, mark it verified directly in the database, and log
/// in. Returns the bearer token.
pub async fn register_verified_user(
    client: &Client,
    pool: &PgPool,
    email: &str,
    password: &str,
) -> String {
    let base = base_url();
    let resp = client
        .post(format!("{base}/users/register"))
        .json(&json!({"name": "Test User", "email": email, "password": password}))
        .send()
        .await
        .expect("Failed to register");
    assert!(
        resp.status().is_success(),
        "register failed: {}",
        resp.text().await.unwrap()
    );

    sqlx::query("UPDATE users SET email_verified = true WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await
        .expect("Failed to mark email verified");

    login(client, email, password).await.token
}

/// Log in as a user and return the full response.
pub async fn login(client: &Client, email: &str, password: &str) -> LoginResponse {
    let base = base_url();
    let resp = client
        .post(format!("{base}/users/login"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("Failed to login");
    assert!(
        resp.status().is_success(),
        "login failed: {}",
        resp.text().await.unwrap()
    );
    resp.json().await.expect("Failed to parse login response")
}

/// Log in as the configured test admin and return the bearer token.
pub async fn admin_token(client: &Client) -> String {
    let email = std::env::var("VELOUR_ADMIN_EMAIL").expect("VELOUR_ADMIN_EMAIL must be set");
    let password =
        std::env::var("VELOUR_ADMIN_PASSWORD").expect("VELOUR_ADMIN_PASSWORD must be set");

    let base = base_url();
    let resp = client
        .post(format!("{base}/admin/login"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("Failed to login as admin");
    assert!(
        resp.status().is_success(),
        "admin login failed: {}",
        resp.text().await.unwrap()
    );
    let body: LoginResponse = resp.json().await.expect("Failed to parse admin login");
    body.token
}

/// Create a product through the admin API and return its id.
pub async fn create_test_product(client: &Client, admin_token: &str, name: &str) -> ProductId {
    let base = base_url();
    let resp = client
        .post(format!("{base}/admin/products"))
        .bearer_auth(admin_token)
        .json(&json!({
            "name": name,
            "description": "Fixture product",
            "images": ["https://cdn.velour.test/fixture.jpg"],
            "sizes": [
                {"label": "S", "price": "100.00", "stock": 10},
                {"label": "M", "price": "110.00", "stock": 10}
            ],
            "colors": [{"label": "Black"}],
            "trade_price": "60.00"
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert!(
        resp.status().is_success(),
        "product create failed: {}",
        resp.text().await.unwrap()
    );

    let body: Value = resp.json().await.expect("Failed to parse product");
    body["_id"]
        .as_str()
        .expect("product response missing _id")
        .parse()
        .expect("product _id is not a UUID")
}

/// Soft-delete a fixture product through the admin API.
pub async fn delete_test_product(client: &Client, admin_token: &str, product_id: ProductId) {
    let base = base_url();
    let resp = client
        .delete(format!("{base}/admin/products/{product_id}"))
        .bearer_auth(admin_token)
        .send()
        .await
        .expect("Failed to delete product");
    assert!(resp.status().is_success());
}
