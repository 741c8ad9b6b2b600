//! Admin order routes.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use velour_core::{OrderId, PaymentStatus, UserId};

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::{Order, OrderItem, ShippingAddress};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OrderView {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub order_number: String,
    pub user: UserId,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub mobile: String,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub currency: String,
    pub payment_status: PaymentStatus,
    pub delivered: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            user: order.user_id,
            items: order.items,
            shipping_address: order.shipping_address,
            mobile: order.mobile,
            subtotal: order.subtotal,
            tax: order.tax,
            shipping: order.shipping,
            total: order.total,
            currency: order.currency,
            payment_status: order.payment_status,
            delivered: order.delivered,
            created_at: order.created_at,
        }
    }
}

/// All orders, newest first. The dashboard paginates client-side.
///
/// GET /admin/orders
///
/// # Errors
///
/// Returns 401 without an admin token.
#[instrument(skip(state, _admin))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<OrderView>>> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Serialize)]
pub struct DeliverResponse {
    pub success: bool,
    pub delivered: bool,
}

/// Toggle an order's delivered flag, returning the new value.
///
/// PUT /admin/orders/{id}/deliver
///
/// # Errors
///
/// Returns 404 when the order doesn't exist.
#[instrument(skip(state, _admin))]
pub async fn toggle_delivered(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<DeliverResponse>> {
    let delivered = OrderRepository::new(state.pool())
        .toggle_delivered(id)
        .await?;

    Ok(Json(DeliverResponse {
        success: true,
        delivered,
    }))
}
