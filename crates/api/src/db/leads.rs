//! Lead repository: appointment requests and VIP list signups.

use sqlx::PgPool;

use velour_core::AppointmentId;

use super::{RepositoryError, conflict_on_unique};

/// Repository for marketing-lead database operations.
pub struct LeadRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LeadRepository<'a> {
    /// Create a new lead repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record an appointment request.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_appointment(
        &self,
        name: &str,
        email: &str,
        mobile: &str,
        preferred_date: &str,
        message: Option<&str>,
    ) -> Result<AppointmentId, RepositoryError> {
        let id = AppointmentId::generate();

        sqlx::query(
            r"
            INSERT INTO appointments (id, name, email, mobile, preferred_date, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(mobile)
        .bind(preferred_date)
        .bind(message)
        .execute(self.pool)
        .await?;

        Ok(id)
    }

    /// Add an email to the VIP signup list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already signed up.
    pub async fn create_vip_signup(&self, email: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO vip_signups (email) VALUES ($1)")
            .bind(email)
            .execute(self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "This email is already on the VIP list"))?;

        Ok(())
    }
}
