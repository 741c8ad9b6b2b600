//! Storefront user model.

use chrono::{DateTime, Utc};

use velour_core::{Email, UserId};

/// A storefront user account.
///
/// The password hash never leaves this process; route handlers build
/// response DTOs instead of serializing the model directly.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
