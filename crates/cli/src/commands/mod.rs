//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Repository error from the API crate.
    #[error("repository error: {0}")]
    Repository(#[from] velour_api::db::RepositoryError),

    /// Invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Connect to the database named by `VELOUR_DATABASE_URL` (or
/// `DATABASE_URL`).
pub(crate) async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("VELOUR_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("VELOUR_DATABASE_URL"))?;

    let pool = velour_api::db::create_pool(&SecretString::from(database_url)).await?;
    Ok(pool)
}
