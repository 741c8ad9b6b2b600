//! Admin tests: login, catalog management, orders listing.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p velour-api)
//! - An admin account created via `velour-cli admin create`, with its
//!   credentials in `VELOUR_ADMIN_EMAIL` / `VELOUR_ADMIN_PASSWORD`
//!
//! Run with: cargo test -p velour-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use velour_integration_tests::{
    admin_token, base_url, client, create_test_product, delete_test_product,
    register_verified_user, test_pool, unique_email,
};

#[tokio::test]
#[ignore = "Requires a running API server and admin account"]
async fn test_admin_login_and_profile() {
    let client = client();
    let base = base_url();
    let token = admin_token(&client).await;

    let resp = client
        .get(format!("{base}/admin/profile"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get admin profile");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse profile");
    assert!(body["_id"].is_string());
    assert!(body["email"].is_string());
}

#[tokio::test]
#[ignore = "Requires a running API server and admin account"]
async fn test_admin_login_bad_credentials() {
    let client = client();
    let base = base_url();

    let resp = client
        .post(format!("{base}/admin/login"))
        .json(&json!({"email": "nobody@velour.test", "password": "wrong entirely"}))
        .send()
        .await
        .expect("Failed to post login");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running API server and admin account"]
async fn test_user_token_rejected_on_admin_routes() {
    let client = client();
    let pool = test_pool().await;
    let base = base_url();

    let user_token =
        register_verified_user(&client, &pool, &unique_email("not-admin"), "not admin pw").await;

    let resp = client
        .get(format!("{base}/admin/orders"))
        .bearer_auth(&user_token)
        .send()
        .await
        .expect("Failed to get orders");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running API server and admin account"]
async fn test_category_create_and_delete() {
    let client = client();
    let base = base_url();
    let token = admin_token(&client).await;

    let name = format!("Test Capsule {}", uuid::Uuid::new_v4().simple());
    let resp = client
        .post(format!("{base}/admin/categories"))
        .bearer_auth(&token)
        .json(&json!({"name": name, "description": "Fixture category"}))
        .send()
        .await
        .expect("Failed to create category");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse category");
    let id = body["_id"].as_str().expect("category id").to_string();
    assert!(body["slug"].as_str().expect("slug").starts_with("test-capsule-"));

    // Visible on the public listing
    let resp = client
        .get(format!("{base}/categories"))
        .send()
        .await
        .expect("Failed to list categories");
    let listing: Value = resp.json().await.expect("Failed to parse listing");
    assert!(
        listing
            .as_array()
            .expect("category array")
            .iter()
            .any(|c| c["_id"] == json!(id.clone()))
    );

    let resp = client
        .delete(format!("{base}/admin/categories/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete category");
    assert_eq!(resp.status(), StatusCode::OK);

    // Gone means a second delete is a 404
    let resp = client
        .delete(format!("{base}/admin/categories/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete category");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running API server and admin account"]
async fn test_product_update_and_soft_delete() {
    let client = client();
    let base = base_url();
    let token = admin_token(&client).await;

    let product_id = create_test_product(&client, &token, "Lifecycle Fixture").await;

    // Admin responses include the trade price
    let resp = client
        .put(format!("{base}/admin/products/{product_id}"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Lifecycle Fixture Renamed",
            "description": "Updated copy",
            "images": ["https://cdn.velour.test/fixture-2.jpg"],
            "sizes": [{"label": "S", "price": "120.00", "stock": 5}],
            "colors": [{"label": "Ecru"}],
            "trade_price": "70.00"
        }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(body["name"], json!("Lifecycle Fixture Renamed"));
    assert_eq!(body["trade_price"], json!("70.00"));
    assert_eq!(body["sizes"].as_array().map(Vec::len), Some(1));

    // Anonymous catalog view never carries the trade price
    let resp = client
        .get(format!("{base}/products/{product_id}"))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::OK);
    let public: Value = resp.json().await.expect("Failed to parse product");
    assert!(public.get("trade_price").is_none());

    // Soft delete hides it from the storefront
    delete_test_product(&client, &token, product_id).await;

    let resp = client
        .get(format!("{base}/products/{product_id}"))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running API server and admin account"]
async fn test_orders_listing_shape() {
    let client = client();
    let base = base_url();
    let token = admin_token(&client).await;

    let resp = client
        .get(format!("{base}/admin/orders"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list orders");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse orders");
    for order in body.as_array().expect("orders array") {
        assert!(order["_id"].is_string());
        assert!(order["order_number"].is_string());
        assert!(order["payment_status"].is_string());
        assert!(order["delivered"].is_boolean());
    }
}
