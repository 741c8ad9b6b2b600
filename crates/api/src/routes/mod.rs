//! HTTP route handlers for the Velour API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (database ping)
//!
//! # Auth & account
//! POST /users/register          - Create account, send verification email
//! POST /users/login             - Login, returns bearer token
//! POST /users/logout            - Invalidate bearer token
//! GET  /profile                 - Current user (requires user token)
//! GET  /users/verify-email/{token}    - Confirm email address
//! POST /users/resend-verification     - Re-send verification link
//! POST /users/forgot-password         - Send password reset link
//! GET  /users/reset-password/{token}  - Check reset token validity
//! PUT  /users/reset-password/{token}  - Set new password
//!
//! # Catalog
//! GET  /categories              - Category listing
//! GET  /products                - Product listing (category/search filters)
//! GET  /products/{id}           - Product detail
//!
//! # Cart (requires user token)
//! GET    /cart                  - Cart with live product data
//! POST   /cart                  - Add line (upserts on product/size/color)
//! PUT    /cart/{id}             - Update line quantity
//! DELETE /cart/{id}             - Remove line
//! DELETE /cart                  - Clear cart
//!
//! # Checkout (requires user token)
//! POST /payment/create-order    - Create order + gateway order
//! POST /payment/verify          - Verify payment signature
//!
//! # Wishlist (requires user token)
//! GET    /users/wishlist
//! POST   /users/wishlist/{product_id}
//! DELETE /users/wishlist/{product_id}
//!
//! # Leads & trade
//! POST /appointment             - Appointment request
//! POST /vip-signup              - VIP list signup
//! POST /trades/register         - Trader application
//!
//! # Admin (requires admin token)
//! POST   /admin/login
//! GET    /admin/profile
//! POST   /admin/categories
//! DELETE /admin/categories/{id}
//! POST   /admin/products
//! PUT    /admin/products/{id}
//! DELETE /admin/products/{id}   - Soft delete
//! GET    /admin/orders          - All orders, newest first
//! PUT    /admin/orders/{id}/deliver   - Toggle delivered flag
//! GET    /admin/traders         - Applications (optional ?status=)
//! PUT    /admin/traders/{id}/approve
//! PUT    /admin/traders/{id}/reject
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod leads;
pub mod products;
pub mod traders;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the user auth and account routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/verify-email/{token}", get(auth::verify_email))
        .route("/resend-verification", post(auth::resend_verification))
        .route("/forgot-password", post(auth::forgot_password))
        .route(
            "/reset-password/{token}",
            get(auth::check_reset_token).put(auth::reset_password),
        )
        .route("/wishlist", get(wishlist::list))
        .route(
            "/wishlist/{product_id}",
            post(wishlist::add).delete(wishlist::remove),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add).delete(cart::clear))
        .route("/{id}", put(cart::update).delete(cart::remove))
}

/// Create the checkout routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/create-order", post(checkout::create_order))
        .route("/verify", post(checkout::verify))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::auth::login))
        .route("/profile", get(admin::auth::profile))
        .route("/categories", post(admin::categories::create))
        .route("/categories/{id}", delete(admin::categories::remove))
        .route("/products", post(admin::products::create))
        .route(
            "/products/{id}",
            put(admin::products::update).delete(admin::products::remove),
        )
        .route("/orders", get(admin::orders::list))
        .route("/orders/{id}/deliver", put(admin::orders::toggle_delivered))
        .route("/traders", get(admin::traders::list))
        .route("/traders/{id}/approve", put(admin::traders::approve))
        .route("/traders/{id}/reject", put(admin::traders::reject))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        .route("/profile", get(auth::profile))
        .nest("/users", user_routes())
        .route("/categories", get(products::categories))
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .nest("/cart", cart_routes())
        .nest("/payment", payment_routes())
        .route("/appointment", post(leads::appointment))
        .route("/vip-signup", post(leads::vip_signup))
        .route("/trades/register", post(traders::register))
        .nest("/admin", admin_routes())
}
