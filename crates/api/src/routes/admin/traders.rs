//! Admin trader review routes.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use velour_core::{TraderId, TraderStatus};

use crate::db::TraderRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::Trader;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TraderView {
    #[serde(rename = "_id")]
    pub id: TraderId,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub company: Option<String>,
    pub message: Option<String>,
    pub status: TraderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Trader> for TraderView {
    fn from(trader: Trader) -> Self {
        Self {
            id: trader.id,
            name: trader.name,
            email: trader.email.into_inner(),
            mobile: trader.mobile,
            company: trader.company,
            message: trader.message,
            status: trader.status,
            created_at: trader.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TraderListQuery {
    pub status: Option<TraderStatus>,
}

/// Trader applications, newest first, optionally filtered by status.
///
/// GET /admin/traders?status=pending
///
/// # Errors
///
/// Returns 401 without an admin token.
#[instrument(skip(state, _admin))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<TraderListQuery>,
) -> Result<Json<Vec<TraderView>>> {
    let traders = TraderRepository::new(state.pool())
        .list(query.status)
        .await?;

    Ok(Json(traders.into_iter().map(Into::into).collect()))
}

/// Approve an application, unlocking trade pricing for its email.
///
/// PUT /admin/traders/{id}/approve
///
/// # Errors
///
/// Returns 404 when the trader doesn't exist.
#[instrument(skip(state, _admin))]
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<TraderId>,
) -> Result<Json<TraderView>> {
    let trader = TraderRepository::new(state.pool())
        .set_status(id, TraderStatus::Approved)
        .await?;

    Ok(Json(trader.into()))
}

/// Reject an application.
///
/// PUT /admin/traders/{id}/reject
///
/// # Errors
///
/// Returns 404 when the trader doesn't exist.
#[instrument(skip(state, _admin))]
pub async fn reject(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<TraderId>,
) -> Result<Json<TraderView>> {
    let trader = TraderRepository::new(state.pool())
        .set_status(id, TraderStatus::Rejected)
        .await?;

    Ok(Json(trader.into()))
}
