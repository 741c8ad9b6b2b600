//! Trader application routes.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use velour_core::Email;

use crate::db::TraderRepository;
use crate::error::{AppError, Result};
use crate::routes::auth::MessageResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TradeApplicationRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub company: Option<String>,
    pub message: Option<String>,
}

/// Submit a wholesale trade application. It lands `pending` until an
/// admin reviews it.
///
/// POST /trades/register
///
/// # Errors
///
/// Returns 409 when an application already exists for the email.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<TradeApplicationRequest>,
) -> Result<Json<MessageResponse>> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if body.mobile.trim().is_empty() {
        return Err(AppError::BadRequest("Mobile number is required".to_string()));
    }

    let email = Email::parse(&body.email)
        .map_err(|_| AppError::BadRequest("Invalid email address".to_string()))?;

    TraderRepository::new(state.pool())
        .create(
            name,
            email.as_str(),
            body.mobile.trim(),
            body.company.as_deref(),
            body.message.as_deref(),
        )
        .await?;

    Ok(MessageResponse::ok(
        "Application received. We'll review it and get back to you.",
    ))
}
