//! Trader (wholesale) account model.

use chrono::{DateTime, Utc};

use velour_core::{Email, TraderId, TraderStatus};

/// A trader application.
///
/// Traders register through the storefront and stay `pending` until an
/// admin approves or rejects them. Only approved traders are shown trade
/// pricing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Trader {
    pub id: TraderId,
    /// Contact name.
    pub name: String,
    pub email: Email,
    pub mobile: String,
    /// Business name, if given.
    pub company: Option<String>,
    /// Free-text note from the application form.
    pub message: Option<String>,
    pub status: TraderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
