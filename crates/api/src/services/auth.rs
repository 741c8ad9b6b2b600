//! Authentication service.
//!
//! Handles registration, login, and the token lifecycle for both storefront
//! users and dashboard admins. Bearer tokens are opaque random strings
//! stored server-side; clients keep them in local storage and send them in
//! the `Authorization` header.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use sqlx::PgPool;
use thiserror::Error;

use velour_core::{Email, EmailError, UserId};

use crate::db::tokens::TokenSubject;
use crate::db::{AdminRepository, RepositoryError, TokenRepository, UserRepository};
use crate::models::{Admin, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Random bytes per generated token (base64url-encoded before storage).
const TOKEN_BYTES: usize = 32;

/// Lifetime of verification and reset links, in hours.
const ACTION_TOKEN_TTL_HOURS: i64 = 24;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Invalid credentials (wrong password or account not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Bearer, verification, or reset token is unknown or expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Account already exists for the email.
    #[error("account already exists")]
    UserAlreadyExists,

    /// Login attempted before the email was verified.
    #[error("email not verified")]
    EmailNotVerified,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    admins: AdminRepository<'a>,
    tokens: TokenRepository<'a>,
    token_ttl_hours: i64,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, token_ttl_hours: i64) -> Self {
        Self {
            users: UserRepository::new(pool),
            admins: AdminRepository::new(pool),
            tokens: TokenRepository::new(pool),
            token_ttl_hours,
        }
    }

    /// Register a new user and issue an email verification token.
    ///
    /// Returns the created user together with the verification token to be
    /// embedded in the verification link.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let verification_token = generate_token();
        self.tokens
            .insert_verification_token(&verification_token, user.id, ACTION_TOKEN_TTL_HOURS)
            .await?;

        Ok((user, verification_token))
    }

    /// Login a user with email and password, issuing a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::EmailNotVerified` if the account hasn't confirmed
    /// its email yet.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        if !user.email_verified {
            return Err(AuthError::EmailNotVerified);
        }

        let token = generate_token();
        self.tokens
            .insert_user_token(&token, user.id, self.token_ttl_hours)
            .await?;

        Ok((user, token))
    }

    /// Login an admin with email and password, issuing a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Admin, String), AuthError> {
        let email = Email::parse(email)?;

        let admin = self
            .admins
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &admin.password_hash)?;

        let token = generate_token();
        self.tokens
            .insert_admin_token(&token, admin.id, self.token_ttl_hours)
            .await?;

        Ok((admin, token))
    }

    /// Invalidate a bearer token. Unknown tokens are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.tokens.delete(token).await?;
        Ok(())
    }

    /// Resolve a bearer token to its subject.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is unknown or expired.
    pub async fn resolve_token(&self, token: &str) -> Result<TokenSubject, AuthError> {
        self.tokens
            .resolve(token)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    /// Consume an email verification token and mark the user verified.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is unknown or expired.
    pub async fn verify_email(&self, token: &str) -> Result<UserId, AuthError> {
        let user_id = self
            .tokens
            .consume_verification_token(token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        self.users.verify_email(user_id).await?;
        Ok(user_id)
    }

    /// Issue a fresh verification token for an unverified account.
    ///
    /// Returns `None` when the email has no account or is already verified,
    /// so the endpoint can respond identically either way.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    pub async fn resend_verification(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, AuthError> {
        let email = Email::parse(email)?;

        let Some(user) = self.users.get_by_email(&email).await? else {
            return Ok(None);
        };
        if user.email_verified {
            return Ok(None);
        }

        let token = generate_token();
        self.tokens
            .insert_verification_token(&token, user.id, ACTION_TOKEN_TTL_HOURS)
            .await?;

        Ok(Some((user, token)))
    }

    /// Issue a password reset token for an account, if one exists.
    ///
    /// Returns `None` when the email has no account; the endpoint responds
    /// the same either way to avoid leaking which emails are registered.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    pub async fn forgot_password(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, AuthError> {
        let email = Email::parse(email)?;

        let Some(user) = self.users.get_by_email(&email).await? else {
            return Ok(None);
        };

        let token = generate_token();
        self.tokens
            .insert_reset_token(&token, user.id, ACTION_TOKEN_TTL_HOURS)
            .await?;

        Ok(Some((user, token)))
    }

    /// Check whether a password reset token is still valid, without
    /// consuming it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn check_reset_token(&self, token: &str) -> Result<bool, AuthError> {
        Ok(self.tokens.peek_reset_token(token).await?.is_some())
    }

    /// Consume a password reset token and set the new password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the token is unknown or expired.
    /// Returns `AuthError::WeakPassword` if the new password doesn't meet
    /// requirements.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        validate_password(new_password)?;

        let user_id = self
            .tokens
            .consume_reset_token(token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let password_hash = hash_password(new_password)?;
        self.users.set_password_hash(user_id, &password_hash).await?;

        Ok(())
    }
}

/// Generate an opaque random token, base64url-encoded.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique_and_url_safe() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        // 32 bytes of entropy encodes to 43 base64url characters
        assert_eq!(a.len(), 43);
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
