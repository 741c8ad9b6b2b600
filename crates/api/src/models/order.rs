//! Order models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use velour_core::{OrderId, PaymentStatus, ProductId, UserId};

/// Shipping address captured at checkout.
///
/// The form only enforces presence; no format validation beyond that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// A persisted order with its line items.
///
/// Created when checkout begins (`payment_status = created`) and settled by
/// signature verification. The gateway order id ties the row to the payment
/// widget session; there is exactly one per checkout attempt.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub mobile: String,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub currency: String,
    pub payment_status: PaymentStatus,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub delivered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item snapshot on an order.
///
/// Product details are copied at checkout time so later catalog edits or
/// deletes never rewrite order history.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: i32,
    pub size: String,
    pub color: String,
    pub unit_price: Decimal,
    pub image: Option<String>,
}
