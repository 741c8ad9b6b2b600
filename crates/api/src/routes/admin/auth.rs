//! Admin login and profile routes.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use velour_core::AdminId;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::Admin;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AdminView {
    #[serde(rename = "_id")]
    pub id: AdminId,
    pub name: String,
    pub email: String,
}

impl From<Admin> for AdminView {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            name: admin.name,
            email: admin.email.into_inner(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub admin: AdminView,
    pub token: String,
}

/// Admin login.
///
/// POST /admin/login
///
/// # Errors
///
/// Returns 401 for bad credentials.
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (admin, token) = state
        .auth()
        .login_admin(&body.email, &body.password)
        .await?;

    Ok(Json(LoginResponse {
        admin: admin.into(),
        token,
    }))
}

/// Current admin from the bearer token. The dashboard clients call this
/// on load as their access check.
///
/// GET /admin/profile
///
/// # Errors
///
/// Returns 401 without a valid admin token.
pub async fn profile(RequireAdmin(admin): RequireAdmin) -> Json<AdminView> {
    Json(admin.into())
}
