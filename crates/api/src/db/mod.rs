//! Database operations for the Velour `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` / `admins` - Storefront and dashboard authentication
//! - `auth_tokens` - Opaque bearer tokens for both roles
//! - `email_verification_tokens` / `password_reset_tokens` - Single-use links
//! - `traders` - Wholesale applications and their approval state
//! - `categories`, `products`, `product_sizes`, `product_colors` - Catalog
//! - `cart_items` - Per-user cart lines with captured prices
//! - `orders`, `order_items` - Checkout results
//! - `wishlist_items` - Per-user wishlist
//! - `appointments`, `vip_signups` - Storefront lead capture
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p velour-cli -- migrate
//! ```
//!
//! Queries use the runtime-checked `sqlx::query_as` API so the workspace
//! builds without a live database.

pub mod admins;
pub mod carts;
pub mod categories;
pub mod leads;
pub mod orders;
pub mod products;
pub mod tokens;
pub mod traders;
pub mod users;
pub mod wishlists;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admins::AdminRepository;
pub use carts::CartRepository;
pub use categories::CategoryRepository;
pub use leads::LeadRepository;
pub use orders::{NewOrder, OrderRepository};
pub use products::ProductRepository;
pub use tokens::TokenRepository;
pub use traders::TraderRepository;
pub use users::UserRepository;
pub use wishlists::WishlistRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error to `Conflict` when it is a unique violation.
fn conflict_on_unique(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}
