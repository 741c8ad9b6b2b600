//! Business logic services.
//!
//! Services sit between route handlers and the repository layer:
//!
//! - [`auth`] - Registration, login, and token lifecycle for users and admins
//! - [`payment`] - Payment gateway client and signature verification
//! - [`email`] - Transactional email over SMTP

pub mod auth;
pub mod email;
pub mod payment;

pub use auth::AuthService;
pub use email::EmailService;
pub use payment::PaymentClient;
