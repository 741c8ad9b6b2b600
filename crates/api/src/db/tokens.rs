//! Token repositories: bearer auth tokens and single-use action tokens.
//!
//! Bearer tokens are opaque random strings the clients persist locally and
//! send in the `Authorization` header. Action tokens (email verification,
//! password reset) are consumed on first successful use.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use velour_core::{AdminId, UserId};

use super::RepositoryError;

/// The principal a bearer token resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSubject {
    User(UserId),
    Admin(AdminId),
}

#[derive(sqlx::FromRow)]
struct AuthTokenRow {
    user_id: Option<UserId>,
    admin_id: Option<AdminId>,
    expires_at: DateTime<Utc>,
}

/// Repository for token database operations.
pub struct TokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenRepository<'a> {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a bearer token for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_user_token(
        &self,
        token: &str,
        user_id: UserId,
        ttl_hours: i64,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO auth_tokens (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(token)
        .bind(user_id)
        .bind(Utc::now() + Duration::hours(ttl_hours))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Store a bearer token for an admin.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_admin_token(
        &self,
        token: &str,
        admin_id: AdminId,
        ttl_hours: i64,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO auth_tokens (token, admin_id, expires_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(token)
        .bind(admin_id)
        .bind(Utc::now() + Duration::hours(ttl_hours))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Resolve a bearer token to its subject, ignoring expired tokens.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a token row has no subject.
    pub async fn resolve(&self, token: &str) -> Result<Option<TokenSubject>, RepositoryError> {
        let row = sqlx::query_as::<_, AuthTokenRow>(
            r"
            SELECT user_id, admin_id, expires_at
            FROM auth_tokens
            WHERE token = $1
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        if row.expires_at < Utc::now() {
            return Ok(None);
        }

        match (row.user_id, row.admin_id) {
            (Some(user_id), _) => Ok(Some(TokenSubject::User(user_id))),
            (None, Some(admin_id)) => Ok(Some(TokenSubject::Admin(admin_id))),
            (None, None) => Err(RepositoryError::DataCorruption(
                "auth token without a subject".to_owned(),
            )),
        }
    }

    /// Delete a bearer token (logout).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, token: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM auth_tokens WHERE token = $1")
            .bind(token)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Single-use action tokens
    // =========================================================================

    /// Store an email verification token, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_verification_token(
        &self,
        token: &str,
        user_id: UserId,
        ttl_hours: i64,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO email_verification_tokens (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET token = EXCLUDED.token, expires_at = EXCLUDED.expires_at
            ",
        )
        .bind(token)
        .bind(user_id)
        .bind(Utc::now() + Duration::hours(ttl_hours))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Consume an email verification token, returning its user.
    ///
    /// The token row is deleted whether or not it was still valid, so a
    /// link can only be exercised once.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn consume_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<UserId>, RepositoryError> {
        let row = sqlx::query_as::<_, (UserId, DateTime<Utc>)>(
            r"
            DELETE FROM email_verification_tokens
            WHERE token = $1
            RETURNING user_id, expires_at
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.and_then(|(user_id, expires_at)| (expires_at >= Utc::now()).then_some(user_id)))
    }

    /// Store a password reset token, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_reset_token(
        &self,
        token: &str,
        user_id: UserId,
        ttl_hours: i64,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO password_reset_tokens (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET token = EXCLUDED.token, expires_at = EXCLUDED.expires_at
            ",
        )
        .bind(token)
        .bind(user_id)
        .bind(Utc::now() + Duration::hours(ttl_hours))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Look up a password reset token without consuming it.
    ///
    /// Used by the reset form's validity check before the user types a new
    /// password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn peek_reset_token(&self, token: &str) -> Result<Option<UserId>, RepositoryError> {
        let row = sqlx::query_as::<_, (UserId, DateTime<Utc>)>(
            r"
            SELECT user_id, expires_at
            FROM password_reset_tokens
            WHERE token = $1
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.and_then(|(user_id, expires_at)| (expires_at >= Utc::now()).then_some(user_id)))
    }

    /// Consume a password reset token, returning its user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn consume_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<UserId>, RepositoryError> {
        let row = sqlx::query_as::<_, (UserId, DateTime<Utc>)>(
            r"
            DELETE FROM password_reset_tokens
            WHERE token = $1
            RETURNING user_id, expires_at
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.and_then(|(user_id, expires_at)| (expires_at >= Utc::now()).then_some(user_id)))
    }
}
