//! Domain models for the API.
//!
//! Models map 1:1 to database rows where possible; composite models
//! (products with variants, orders with line items) are assembled by the
//! repositories in [`crate::db`].

pub mod admin;
pub mod cart;
pub mod order;
pub mod product;
pub mod trader;
pub mod user;

pub use admin::Admin;
pub use cart::CartItem;
pub use order::{Order, OrderItem, ShippingAddress};
pub use product::{Category, ColorVariant, Product, SizeVariant};
pub use trader::Trader;
pub use user::User;
