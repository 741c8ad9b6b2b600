//! Lead capture, trade applications, and wishlist tests.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p velour-api)
//! - `VELOUR_ADMIN_EMAIL` / `VELOUR_ADMIN_PASSWORD` for the approval flow
//!
//! Run with: cargo test -p velour-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use velour_integration_tests::{
    admin_token, base_url, client, create_test_product, delete_test_product,
    register_verified_user, test_pool, unique_email,
};

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_appointment_request() {
    let client = client();
    let base = base_url();

    let resp = client
        .post(format!("{base}/appointment"))
        .json(&json!({
            "name": "Showroom Visitor",
            "email": unique_email("appointment"),
            "mobile": "07700900001",
            "preferred_date": "2026-09-14",
            "message": "Interested in the autumn capsule"
        }))
        .send()
        .await
        .expect("Failed to request appointment");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_appointment_rejects_invalid_email() {
    let client = client();
    let base = base_url();

    let resp = client
        .post(format!("{base}/appointment"))
        .json(&json!({
            "name": "Typo Hands",
            "email": "not-an-email",
            "mobile": "07700900002",
            "preferred_date": "2026-09-14"
        }))
        .send()
        .await
        .expect("Failed to request appointment");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_vip_signup_duplicate_conflict() {
    let client = client();
    let base = base_url();
    let email = unique_email("vip");

    for expected in [StatusCode::OK, StatusCode::CONFLICT] {
        let resp = client
            .post(format!("{base}/vip-signup"))
            .json(&json!({"email": email}))
            .send()
            .await
            .expect("Failed to sign up");
        assert_eq!(resp.status(), expected);
    }
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_trade_application_duplicate_conflict() {
    let client = client();
    let base = base_url();
    let email = unique_email("trade-dup");

    for expected in [StatusCode::OK, StatusCode::CONFLICT] {
        let resp = client
            .post(format!("{base}/trades/register"))
            .json(&json!({
                "name": "Stockist Buyer",
                "email": email,
                "mobile": "07700900003",
                "company": "Stockist & Co",
                "message": "Wholesale enquiry"
            }))
            .send()
            .await
            .expect("Failed to apply");
        assert_eq!(resp.status(), expected);
    }
}

/// An approved trade application unlocks trade pricing for the account
/// that shares its email.
#[tokio::test]
#[ignore = "Requires a running API server, database, and admin account"]
async fn test_trader_approval_unlocks_trade_price() {
    let client = client();
    let pool = test_pool().await;
    let base = base_url();

    let admin = admin_token(&client).await;
    let product_id = create_test_product(&client, &admin, "Trade Price Fixture").await;

    let email = unique_email("trader");
    let user_token = register_verified_user(&client, &pool, &email, "trader account pw").await;

    let resp = client
        .post(format!("{base}/trades/register"))
        .json(&json!({
            "name": "Trade Buyer",
            "email": email,
            "mobile": "07700900004"
        }))
        .send()
        .await
        .expect("Failed to apply");
    assert_eq!(resp.status(), StatusCode::OK);

    // Pending application doesn't unlock anything
    let resp = client
        .get(format!("{base}/products/{product_id}"))
        .bearer_auth(&user_token)
        .send()
        .await
        .expect("Failed to get product");
    let body: Value = resp.json().await.expect("Failed to parse product");
    assert!(body.get("trade_price").is_none());

    // Find and approve the application
    let resp = client
        .get(format!("{base}/admin/traders?status=pending"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to list traders");
    let traders: Value = resp.json().await.expect("Failed to parse traders");
    let trader_id = traders
        .as_array()
        .expect("trader array")
        .iter()
        .find(|t| t["email"] == json!(email.clone()))
        .and_then(|t| t["_id"].as_str())
        .expect("application should be listed")
        .to_string();

    let resp = client
        .put(format!("{base}/admin/traders/{trader_id}/approve"))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to approve");
    assert_eq!(resp.status(), StatusCode::OK);
    let approved: Value = resp.json().await.expect("Failed to parse trader");
    assert_eq!(approved["status"], json!("approved"));

    // Approved: the same request now carries the trade price
    let resp = client
        .get(format!("{base}/products/{product_id}"))
        .bearer_auth(&user_token)
        .send()
        .await
        .expect("Failed to get product");
    let body: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(body["trade_price"], json!("60.00"));

    // Anonymous requests still never see it
    let resp = client
        .get(format!("{base}/products/{product_id}"))
        .send()
        .await
        .expect("Failed to get product");
    let body: Value = resp.json().await.expect("Failed to parse product");
    assert!(body.get("trade_price").is_none());

    delete_test_product(&client, &admin, product_id).await;
}

#[tokio::test]
#[ignore = "Requires a running API server, database, and admin account"]
async fn test_wishlist_add_list_remove() {
    let client = client();
    let pool = test_pool().await;
    let base = base_url();

    let admin = admin_token(&client).await;
    let product_id = create_test_product(&client, &admin, "Wishlist Fixture").await;
    let token = register_verified_user(&client, &pool, &unique_email("wish"), "wishlist pw").await;

    let resp = client
        .post(format!("{base}/users/wishlist/{product_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to add to wishlist");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/users/wishlist"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get wishlist");
    let body: Value = resp.json().await.expect("Failed to parse wishlist");
    assert_eq!(body["items"][0]["_id"], json!(product_id.to_string()));

    let resp = client
        .delete(format!("{base}/users/wishlist/{product_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to remove from wishlist");
    assert_eq!(resp.status(), StatusCode::OK);

    // Removing again is a 404
    let resp = client
        .delete(format!("{base}/users/wishlist/{product_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to remove from wishlist");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    delete_test_product(&client, &admin, product_id).await;
}
