//! Admin dashboard routes, all gated by an admin bearer token.

pub mod auth;
pub mod categories;
pub mod orders;
pub mod products;
pub mod traders;
