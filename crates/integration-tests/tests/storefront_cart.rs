//! Cart tests: add, update, remove, clear, and removed-product handling.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p velour-api)
//! - `VELOUR_ADMIN_EMAIL` / `VELOUR_ADMIN_PASSWORD` for product fixtures
//!
//! Run with: cargo test -p velour-integration-tests -- --ignored

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use velour_integration_tests::{
    admin_token, base_url, client, create_test_product, delete_test_product,
    register_verified_user, test_pool, unique_email,
};

fn total_of(body: &Value) -> Decimal {
    body["total"]
        .as_str()
        .expect("total should be a decimal string")
        .parse()
        .expect("total should parse as a decimal")
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_cart_requires_auth() {
    let client = client();
    let resp = client
        .get(format!("{}/cart", base_url()))
        .send()
        .await
        .expect("Failed to get cart");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_cart_add_update_remove_flow() {
    let client = client();
    let pool = test_pool().await;
    let base = base_url();

    let admin = admin_token(&client).await;
    let product_id = create_test_product(&client, &admin, "Cart Flow Fixture").await;
    let token =
        register_verified_user(&client, &pool, &unique_email("cart-flow"), "cart flow pw").await;

    // Add: size S is priced 100.00 on the fixture
    let resp = client
        .post(format!("{base}/cart"))
        .bearer_auth(&token)
        .json(&json!({"product": product_id, "size": "S", "color": "Black", "quantity": 2}))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(total_of(&body), "200.00".parse::<Decimal>().unwrap());

    // Same product/size/color bumps the existing line
    let resp = client
        .post(format!("{base}/cart"))
        .bearer_auth(&token)
        .json(&json!({"product": product_id, "size": "S", "color": "Black", "quantity": 1}))
        .send()
        .await
        .expect("Failed to add to cart");
    let body: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["items"][0]["quantity"], json!(3));

    let line_id = body["items"][0]["_id"].as_str().expect("line id").to_string();

    // Set the quantity directly
    let resp = client
        .put(format!("{base}/cart/{line_id}"))
        .bearer_auth(&token)
        .json(&json!({"quantity": 1}))
        .send()
        .await
        .expect("Failed to update quantity");
    let body: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(body["items"][0]["quantity"], json!(1));
    assert_eq!(total_of(&body), "100.00".parse::<Decimal>().unwrap());

    // Remove the line
    let resp = client
        .delete(format!("{base}/cart/{line_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to remove line");
    let body: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));

    delete_test_product(&client, &admin, product_id).await;
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_cart_rejects_unknown_size_and_zero_quantity() {
    let client = client();
    let pool = test_pool().await;
    let base = base_url();

    let admin = admin_token(&client).await;
    let product_id = create_test_product(&client, &admin, "Cart Validation Fixture").await;
    let token =
        register_verified_user(&client, &pool, &unique_email("cart-val"), "cart val pw").await;

    let resp = client
        .post(format!("{base}/cart"))
        .bearer_auth(&token)
        .json(&json!({"product": product_id, "size": "XXL", "color": "Black", "quantity": 1}))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .post(format!("{base}/cart"))
        .bearer_auth(&token)
        .json(&json!({"product": product_id, "size": "S", "color": "Black", "quantity": 0}))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    delete_test_product(&client, &admin, product_id).await;
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_cart_excludes_removed_products_from_total() {
    let client = client();
    let pool = test_pool().await;
    let base = base_url();

    let admin = admin_token(&client).await;
    let product_id = create_test_product(&client, &admin, "Doomed Fixture").await;
    let token =
        register_verified_user(&client, &pool, &unique_email("cart-orphan"), "orphan pw").await;

    let resp = client
        .post(format!("{base}/cart"))
        .bearer_auth(&token)
        .json(&json!({"product": product_id, "size": "M", "color": "Black", "quantity": 1}))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);

    // The product disappears from the catalog while it sits in the cart
    delete_test_product(&client, &admin, product_id).await;

    let resp = client
        .get(format!("{base}/cart"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get cart");
    let body: Value = resp.json().await.expect("Failed to parse cart");

    assert_eq!(body["removed_count"], json!(1));
    assert_eq!(total_of(&body), Decimal::ZERO);
    assert_eq!(body["items"][0]["product"], Value::Null);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_clear_cart() {
    let client = client();
    let pool = test_pool().await;
    let base = base_url();

    let admin = admin_token(&client).await;
    let product_id = create_test_product(&client, &admin, "Clear Fixture").await;
    let token =
        register_verified_user(&client, &pool, &unique_email("cart-clear"), "clear cart pw").await;

    let resp = client
        .post(format!("{base}/cart"))
        .bearer_auth(&token)
        .json(&json!({"product": product_id, "size": "S", "color": "Black", "quantity": 4}))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .delete(format!("{base}/cart"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to clear cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/cart"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get cart");
    let body: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(total_of(&body), Decimal::ZERO);

    delete_test_product(&client, &admin, product_id).await;
}
