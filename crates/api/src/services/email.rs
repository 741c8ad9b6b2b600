//! Email service for verification links and password resets.
//!
//! Uses SMTP via lettre for delivery. When no SMTP config is present the
//! service runs disabled and logs the links instead, which keeps local
//! development working without a relay.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: String,
    base_url: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// Passing `None` for the config creates a disabled service that logs
    /// instead of sending.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP transport fails to build.
    pub fn new(config: Option<&EmailConfig>, base_url: &str) -> Result<Self, SmtpError> {
        let Some(config) = config else {
            return Ok(Self {
                mailer: None,
                from_address: String::new(),
                base_url: base_url.to_owned(),
            });
        };

        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer: Some(mailer),
            from_address: config.from_address.clone(),
            base_url: base_url.to_owned(),
        })
    }

    /// Send the email verification link for a new account.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send.
    pub async fn send_verification_link(
        &self,
        to: &str,
        name: &str,
        token: &str,
    ) -> Result<(), EmailError> {
        let link = format!("{}/verify-email?token={token}", self.base_url);
        let body = format!(
            "Hi {name},\n\n\
             Welcome to Velour. Please confirm your email address by opening\n\
             the link below:\n\n\
             {link}\n\n\
             The link is valid for 24 hours. If you didn't create an account,\n\
             you can ignore this email.\n"
        );

        self.send_plain_email(to, "Confirm your Velour account", &body)
            .await
    }

    /// Send a password reset link.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send.
    pub async fn send_reset_link(&self, to: &str, token: &str) -> Result<(), EmailError> {
        let link = format!("{}/reset-password?token={token}", self.base_url);
        let body = format!(
            "We received a request to reset your Velour password.\n\n\
             {link}\n\n\
             The link is valid for 24 hours. If you didn't request a reset,\n\
             you can ignore this email and your password will stay unchanged.\n"
        );

        self.send_plain_email(to, "Reset your Velour password", &body)
            .await
    }

    /// Send a plain-text email, or log the subject when sending is disabled.
    async fn send_plain_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let Some(mailer) = &self.mailer else {
            tracing::info!(to = %to, subject = %subject, "Email sending disabled, skipping");
            return Ok(());
        };

        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_service_builds() {
        let service = EmailService::new(None, "https://velour.example").unwrap();
        assert!(service.mailer.is_none());
    }
}
