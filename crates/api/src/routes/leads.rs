//! Lead capture routes: appointments and VIP signups.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use velour_core::Email;

use crate::db::LeadRepository;
use crate::error::{AppError, Result};
use crate::routes::auth::MessageResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AppointmentRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub preferred_date: String,
    pub message: Option<String>,
}

/// Record an appointment request.
///
/// POST /appointment
///
/// # Errors
///
/// Returns 400 for missing fields or an invalid email.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn appointment(
    State(state): State<AppState>,
    Json(body): Json<AppointmentRequest>,
) -> Result<Json<MessageResponse>> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if body.mobile.trim().is_empty() {
        return Err(AppError::BadRequest("Mobile number is required".to_string()));
    }
    if body.preferred_date.trim().is_empty() {
        return Err(AppError::BadRequest("Preferred date is required".to_string()));
    }

    let email = Email::parse(&body.email)
        .map_err(|_| AppError::BadRequest("Invalid email address".to_string()))?;

    LeadRepository::new(state.pool())
        .create_appointment(
            name,
            email.as_str(),
            body.mobile.trim(),
            body.preferred_date.trim(),
            body.message.as_deref(),
        )
        .await?;

    Ok(MessageResponse::ok(
        "Appointment request received. We'll be in touch shortly.",
    ))
}

#[derive(Debug, Deserialize)]
pub struct VipSignupRequest {
    pub email: String,
}

/// Add an email to the VIP list.
///
/// POST /vip-signup
///
/// # Errors
///
/// Returns 409 when the email is already signed up, 400 for an invalid
/// email.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn vip_signup(
    State(state): State<AppState>,
    Json(body): Json<VipSignupRequest>,
) -> Result<Json<MessageResponse>> {
    let email = Email::parse(&body.email)
        .map_err(|_| AppError::BadRequest("Invalid email address".to_string()))?;

    LeadRepository::new(state.pool())
        .create_vip_signup(email.as_str())
        .await?;

    Ok(MessageResponse::ok("Welcome to the VIP list."))
}
