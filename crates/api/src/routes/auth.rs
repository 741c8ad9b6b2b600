//! User authentication and account routes.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use velour_core::UserId;

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::User;
use crate::state::AppState;

/// Public view of a user account.
///
/// The storefront client expects Mongo-style `_id` keys, so views keep
/// that shape on the wire.
#[derive(Debug, Serialize)]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.into_inner(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
}

/// Register a new account and send the verification email.
///
/// POST /users/register
///
/// # Errors
///
/// Returns 409 if the email is taken, 400 for invalid input.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    let (user, verification_token) = state
        .auth()
        .register(name, &body.email, &body.password)
        .await?;

    if let Err(e) = state
        .email()
        .send_verification_link(user.email.as_str(), &user.name, &verification_token)
        .await
    {
        // The account exists either way; the user can ask for a re-send.
        tracing::error!(error = %e, user_id = %user.id, "Failed to send verification email");
    }

    Ok(Json(RegisterResponse {
        success: true,
        message: "Account created. Please check your email to verify your address.".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserView,
    pub token: String,
}

/// Login with email and password.
///
/// POST /users/login
///
/// # Errors
///
/// Returns 401 for bad credentials, 403 for an unverified email.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (user, token) = state.auth().login(&body.email, &body.password).await?;

    Ok(Json(LoginResponse {
        user: user.into(),
        token,
    }))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
        })
    }
}

/// Invalidate the caller's bearer token.
///
/// POST /users/logout
///
/// # Errors
///
/// Returns 500 if the token cannot be deleted.
pub async fn logout(
    State(state): State<AppState>,
    parts: axum::http::request::Parts,
) -> Result<Json<MessageResponse>> {
    if let Some(token) = crate::middleware::bearer_token(&parts) {
        state.auth().logout(token).await?;
    }

    Ok(MessageResponse::ok("Logged out"))
}

/// Current user from the bearer token.
///
/// GET /profile
///
/// # Errors
///
/// Returns 401 without a valid user token.
pub async fn profile(RequireUser(user): RequireUser) -> Json<UserView> {
    Json(user.into())
}

/// Confirm an email address from the verification link.
///
/// GET /users/verify-email/{token}
///
/// # Errors
///
/// Returns 401 if the token is unknown or expired.
#[instrument(skip(state, token))]
pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.auth().verify_email(&token).await?;
    Ok(MessageResponse::ok("Email verified. You can now log in."))
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// Re-send the verification email.
///
/// POST /users/resend-verification
///
/// Responds identically whether or not the email has an account, to avoid
/// leaking which addresses are registered.
///
/// # Errors
///
/// Returns 400 for an invalid email format.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(body): Json<EmailRequest>,
) -> Result<Json<MessageResponse>> {
    if let Some((user, token)) = state.auth().resend_verification(&body.email).await? {
        if let Err(e) = state
            .email()
            .send_verification_link(user.email.as_str(), &user.name, &token)
            .await
        {
            tracing::error!(error = %e, user_id = %user.id, "Failed to send verification email");
        }
    }

    Ok(MessageResponse::ok(
        "If the address has an unverified account, a new link is on its way.",
    ))
}

/// Send a password reset link.
///
/// POST /users/forgot-password
///
/// # Errors
///
/// Returns 400 for an invalid email format.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<EmailRequest>,
) -> Result<Json<MessageResponse>> {
    if let Some((user, token)) = state.auth().forgot_password(&body.email).await? {
        if let Err(e) = state
            .email()
            .send_reset_link(user.email.as_str(), &token)
            .await
        {
            tracing::error!(error = %e, user_id = %user.id, "Failed to send reset email");
        }
    }

    Ok(MessageResponse::ok(
        "If the address has an account, a reset link is on its way.",
    ))
}

/// Check whether a reset token is still usable.
///
/// GET /users/reset-password/{token}
///
/// # Errors
///
/// Returns 401 if the token is unknown or expired.
pub async fn check_reset_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>> {
    if !state.auth().check_reset_token(&token).await? {
        return Err(AppError::Unauthorized(
            "Invalid or expired reset link".to_string(),
        ));
    }

    Ok(MessageResponse::ok("Token is valid"))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Consume a reset token and set the new password.
///
/// PUT /users/reset-password/{token}
///
/// # Errors
///
/// Returns 401 if the token is unknown or expired, 400 for a weak password.
#[instrument(skip(state, token, body))]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    state.auth().reset_password(&token, &body.password).await?;
    Ok(MessageResponse::ok(
        "Password updated. You can now log in with the new password.",
    ))
}
