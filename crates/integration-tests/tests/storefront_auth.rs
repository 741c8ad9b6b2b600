//! Account lifecycle tests: register, verify, login, profile, logout.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p velour-api)
//!
//! Run with: cargo test -p velour-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use velour_integration_tests::{
    LoginResponse, base_url, client, login, register_verified_user, test_pool, unique_email,
};

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_register_verify_login_logout_flow() {
    let client = client();
    let pool = test_pool().await;
    let base = base_url();
    let email = unique_email("auth-flow");
    let password = "correct horse battery";

    // Register
    let resp = client
        .post(format!("{base}/users/register"))
        .json(&json!({"name": "Flow Tester", "email": email, "password": password}))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse register body");
    assert_eq!(body["success"], json!(true));

    // Login before verification is refused
    let resp = client
        .post(format!("{base}/users/login"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Verify directly in the database (the token only exists in the email)
    sqlx::query("UPDATE users SET email_verified = true WHERE email = $1")
        .bind(&email)
        .execute(&pool)
        .await
        .expect("Failed to mark verified");

    let session: LoginResponse = login(&client, &email, password).await;
    assert_eq!(session.email, email);
    assert!(!session.token.is_empty());

    // Profile works with the token
    let resp = client
        .get(format!("{base}/profile"))
        .bearer_auth(&session.token)
        .send()
        .await
        .expect("Failed to get profile");
    assert_eq!(resp.status(), StatusCode::OK);
    let profile: Value = resp.json().await.expect("Failed to parse profile");
    assert_eq!(profile["email"], json!(email.clone()));

    // Logout invalidates it
    let resp = client
        .post(format!("{base}/users/logout"))
        .bearer_auth(&session.token)
        .send()
        .await
        .expect("Failed to logout");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/profile"))
        .bearer_auth(&session.token)
        .send()
        .await
        .expect("Failed to get profile");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_register_duplicate_email_conflict() {
    let client = client();
    let base = base_url();
    let email = unique_email("dup");

    for expected in [StatusCode::OK, StatusCode::CONFLICT] {
        let resp = client
            .post(format!("{base}/users/register"))
            .json(&json!({"name": "Dup", "email": email, "password": "long enough pw"}))
            .send()
            .await
            .expect("Failed to register");
        assert_eq!(resp.status(), expected);
    }
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_register_rejects_weak_password() {
    let client = client();
    let base = base_url();

    let resp = client
        .post(format!("{base}/users/register"))
        .json(&json!({"name": "Weak", "email": unique_email("weak"), "password": "short"}))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_login_wrong_password_unauthorized() {
    let client = client();
    let pool = test_pool().await;
    let base = base_url();
    let email = unique_email("wrong-pw");

    register_verified_user(&client, &pool, &email, "the real password").await;

    let resp = client
        .post(format!("{base}/users/login"))
        .json(&json!({"email": email, "password": "not the password"}))
        .send()
        .await
        .expect("Failed to login");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_forgot_password_does_not_reveal_accounts() {
    let client = client();
    let pool = test_pool().await;
    let base = base_url();
    let email = unique_email("forgot");

    register_verified_user(&client, &pool, &email, "forgettable password").await;

    // Known and unknown addresses get the same response
    let mut bodies = Vec::new();
    for address in [email, unique_email("never-registered")] {
        let resp = client
            .post(format!("{base}/users/forgot-password"))
            .json(&json!({"email": address}))
            .send()
            .await
            .expect("Failed to request reset");
        assert_eq!(resp.status(), StatusCode::OK);
        bodies.push(resp.json::<Value>().await.expect("Failed to parse body"));
    }
    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_reset_password_token_check_rejects_garbage() {
    let client = client();
    let base = base_url();

    let resp = client
        .get(format!("{base}/users/reset-password/not-a-real-token"))
        .send()
        .await
        .expect("Failed to check token");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
