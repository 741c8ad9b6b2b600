//! Cart line model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use velour_core::{CartItemId, ProductId, UserId};

/// A line in a user's cart.
///
/// `price` is captured when the item is added and is what the cart page
/// displays; checkout re-resolves the authoritative price from the size
/// variant and only falls back to this snapshot when the label no longer
/// matches.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
    pub quantity: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}
