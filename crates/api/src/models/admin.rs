//! Admin user model.

use chrono::{DateTime, Utc};

use velour_core::{AdminId, Email};

/// An admin dashboard account.
///
/// Admins live in their own table, entirely separate from storefront users.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Admin {
    pub id: AdminId,
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
