//! Authentication extractors.
//!
//! Clients authenticate with an opaque bearer token from the
//! `Authorization` header. The extractors resolve the token against the
//! `auth_tokens` table and load the current user or admin.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};

use crate::db::tokens::TokenSubject;
use crate::db::{AdminRepository, TokenRepository, UserRepository};
use crate::error::ErrorBody;
use crate::models::{Admin, User};
use crate::state::AppState;

/// Extractor that requires a logged-in storefront user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireUser(pub User);

/// Extractor that requires a logged-in dashboard admin.
pub struct RequireAdmin(pub Admin);

/// Extractor that optionally resolves the current user.
///
/// Unlike `RequireUser`, a missing or invalid token yields `None` instead
/// of rejecting the request. Catalog routes use this to decide whether
/// trade pricing applies.
pub struct OptionalUser(pub Option<User>);

/// Rejection returned when a bearer token is missing, expired, or names
/// the wrong role for the route.
pub enum AuthRejection {
    Unauthorized,
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Not authorized"),
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };
        (
            status,
            Json(ErrorBody {
                success: false,
                message: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Pull the bearer token out of the `Authorization` header.
#[must_use]
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection::Unauthorized)?;

        let subject = TokenRepository::new(state.pool())
            .resolve(token)
            .await
            .map_err(|_| AuthRejection::Internal)?
            .ok_or(AuthRejection::Unauthorized)?;

        let TokenSubject::User(user_id) = subject else {
            return Err(AuthRejection::Unauthorized);
        };

        let user = UserRepository::new(state.pool())
            .get_by_id(user_id)
            .await
            .map_err(|_| AuthRejection::Internal)?
            .ok_or(AuthRejection::Unauthorized)?;

        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection::Unauthorized)?;

        let subject = TokenRepository::new(state.pool())
            .resolve(token)
            .await
            .map_err(|_| AuthRejection::Internal)?
            .ok_or(AuthRejection::Unauthorized)?;

        let TokenSubject::Admin(admin_id) = subject else {
            return Err(AuthRejection::Unauthorized);
        };

        let admin = AdminRepository::new(state.pool())
            .get_by_id(admin_id)
            .await
            .map_err(|_| AuthRejection::Internal)?
            .ok_or(AuthRejection::Unauthorized)?;

        Ok(Self(admin))
    }
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Self(None));
        };

        let subject = TokenRepository::new(state.pool())
            .resolve(token)
            .await
            .ok()
            .flatten();

        let Some(TokenSubject::User(user_id)) = subject else {
            return Ok(Self(None));
        };

        let user = UserRepository::new(state.pool())
            .get_by_id(user_id)
            .await
            .ok()
            .flatten();

        Ok(Self(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with_auth("Bearer abc123");
        assert_eq!(bearer_token(&parts), Some("abc123"));
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        let parts = parts_with_auth("Basic abc123");
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_missing_header_rejected() {
        let (parts, ()) = Request::builder().uri("/").body(()).unwrap().into_parts();
        assert_eq!(bearer_token(&parts), None);
    }
}
