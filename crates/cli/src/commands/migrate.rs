//! Database migration command.
//!
//! Migrations live in `crates/api/migrations/` and are embedded at
//! compile time. They are never run automatically by the server; this
//! command is the only way they execute.

use super::{CommandError, connect};

/// Run pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
