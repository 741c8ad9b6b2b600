//! Trader repository for database operations.

use sqlx::PgPool;

use velour_core::{TraderId, TraderStatus};

use super::{RepositoryError, conflict_on_unique};
use crate::models::Trader;

const SELECT_TRADER: &str = r"
    SELECT id, name, email, mobile, company, message, status, created_at, updated_at
    FROM traders
";

/// Repository for trader database operations.
pub struct TraderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TraderRepository<'a> {
    /// Create a new trader repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a trader application in `pending` state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an application already exists
    /// for the email.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        mobile: &str,
        company: Option<&str>,
        message: Option<&str>,
    ) -> Result<Trader, RepositoryError> {
        let trader = sqlx::query_as::<_, Trader>(
            r"
            INSERT INTO traders (id, name, email, mobile, company, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, mobile, company, message, status, created_at, updated_at
            ",
        )
        .bind(TraderId::generate())
        .bind(name)
        .bind(email)
        .bind(mobile)
        .bind(company)
        .bind(message)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "A trade application already exists for this email"))?;

        Ok(trader)
    }

    /// List trader applications, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<TraderStatus>,
    ) -> Result<Vec<Trader>, RepositoryError> {
        let traders = sqlx::query_as::<_, Trader>(&format!(
            "{SELECT_TRADER} WHERE ($1::trader_status IS NULL OR status = $1) ORDER BY created_at DESC"
        ))
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        Ok(traders)
    }

    /// Check whether an email belongs to an approved trader.
    ///
    /// Used to gate trade pricing on catalog responses.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_approved_email(&self, email: &str) -> Result<bool, RepositoryError> {
        let row = sqlx::query_as::<_, (bool,)>(
            "SELECT EXISTS(SELECT 1 FROM traders WHERE email = $1 AND status = 'approved')",
        )
        .bind(email)
        .fetch_one(self.pool)
        .await?;

        Ok(row.0)
    }

    /// Set a trader application's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the trader doesn't exist.
    pub async fn set_status(
        &self,
        id: TraderId,
        status: TraderStatus,
    ) -> Result<Trader, RepositoryError> {
        let trader = sqlx::query_as::<_, Trader>(
            r"
            UPDATE traders
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, mobile, company, message, status, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(trader)
    }
}
