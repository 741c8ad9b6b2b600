//! Checkout tests: order creation preconditions and payment verification.
//!
//! Order creation against the real gateway is not exercised here (it needs
//! live gateway credentials); these cover the server-side guards.
//!
//! Run with: cargo test -p velour-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use velour_integration_tests::{base_url, client, register_verified_user, test_pool, unique_email};

fn shipping_body() -> Value {
    json!({
        "address": "12 Atelier Row",
        "city": "London",
        "postal_code": "E2 8HD",
        "country": "GB",
        "mobile": "07700900000"
    })
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_checkout_requires_auth() {
    let client = client();
    let base = base_url();

    for path in ["payment/create-order", "payment/verify"] {
        let resp = client
            .post(format!("{base}/{path}"))
            .json(&json!({}))
            .send()
            .await
            .expect("Failed to post");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_create_order_rejects_empty_cart() {
    let client = client();
    let pool = test_pool().await;
    let base = base_url();

    let token =
        register_verified_user(&client, &pool, &unique_email("empty-cart"), "empty cart pw").await;

    let resp = client
        .post(format!("{base}/payment/create-order"))
        .bearer_auth(&token)
        .json(&shipping_body())
        .send()
        .await
        .expect("Failed to create order");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Your cart is empty"));
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_create_order_validates_shipping_fields() {
    let client = client();
    let pool = test_pool().await;
    let base = base_url();

    let token =
        register_verified_user(&client, &pool, &unique_email("bad-ship"), "bad shipping pw").await;

    let mut body = shipping_body();
    body["city"] = json!("   ");

    let resp = client
        .post(format!("{base}/payment/create-order"))
        .bearer_auth(&token)
        .json(&body)
        .send()
        .await
        .expect("Failed to create order");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_verify_rejects_unknown_order() {
    let client = client();
    let pool = test_pool().await;
    let base = base_url();

    let token =
        register_verified_user(&client, &pool, &unique_email("verify"), "verify order pw").await;

    // An order id the gateway never issued, with a made-up signature
    let resp = client
        .post(format!("{base}/payment/verify"))
        .bearer_auth(&token)
        .json(&json!({
            "order_id": format!("order_{}", Uuid::new_v4().simple()),
            "payment_id": format!("pay_{}", Uuid::new_v4().simple()),
            "signature": "00".repeat(32),
        }))
        .send()
        .await
        .expect("Failed to verify");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["message"], json!("Payment verification failed"));
}
