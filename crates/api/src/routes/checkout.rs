//! Checkout routes: gateway order creation and payment verification.
//!
//! The flow is the server half of a widget checkout: `create-order`
//! snapshots the cart into an `Order` and opens a gateway order for the
//! grand total; the browser widget collects payment against it; `verify`
//! recomputes the HMAC signature before trusting the result. The widget
//! reports success for every completed interaction, so only a matching
//! signature moves an order to `paid`.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use velour_core::Money;

use crate::db::{CartRepository, NewOrder, OrderRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::{CartItem, OrderItem, Product, ShippingAddress};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub mobile: String,
}

/// The slice of the gateway order the widget needs.
#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub id: String,
    /// Amount in minor units, as the widget expects.
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order: OrderSummary,
    /// Public gateway key id for the widget.
    pub key: String,
}

/// A cart line priced for checkout against its live product.
struct PricedLine {
    item: CartItem,
    unit_price: Decimal,
    name: String,
    image: Option<String>,
}

/// Resolve authoritative prices for the cart lines that still have a live
/// product. The variant price for the stored size label wins; lines whose
/// label no longer matches fall back to the price captured at add time.
fn price_lines(items: Vec<CartItem>, products: &[Product]) -> Vec<PricedLine> {
    items
        .into_iter()
        .filter_map(|item| {
            let product = products.iter().find(|p| p.id == item.product_id)?;
            let unit_price = product
                .price_for_size(&item.size)
                .unwrap_or(item.price);
            Some(PricedLine {
                name: product.name.clone(),
                image: product.primary_image().map(str::to_owned),
                unit_price,
                item,
            })
        })
        .collect()
}

/// Create an order from the cart and open a gateway order for it.
///
/// POST /payment/create-order
///
/// # Errors
///
/// Returns 400 for an empty cart (nothing is created), 502 when the
/// gateway rejects the order.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_order(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>> {
    for (field, value) in [
        ("Address", &body.address),
        ("City", &body.city),
        ("Postal code", &body.postal_code),
        ("Country", &body.country),
        ("Mobile", &body.mobile),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{field} is required")));
        }
    }

    let items = CartRepository::new(state.pool()).list(user.id).await?;
    let product_ids: Vec<_> = items.iter().map(|i| i.product_id).collect();
    let products = ProductRepository::new(state.pool())
        .get_active_by_ids(&product_ids)
        .await?;

    let lines = price_lines(items, &products);
    if lines.is_empty() {
        return Err(AppError::BadRequest("Your cart is empty".to_string()));
    }

    let subtotal: Decimal = lines
        .iter()
        .map(|l| l.unit_price * Decimal::from(l.item.quantity))
        .sum();
    let tax = Decimal::ZERO;
    let shipping = Decimal::ZERO;
    let total = subtotal + tax + shipping;

    let currency = state.payments().currency();
    let amount_minor = Money::new(total, currency)
        .minor_units()
        .map_err(|e| AppError::Internal(format!("order total not representable: {e}")))?;

    let order_number = generate_order_number();

    // Gateway first: if it rejects the order, nothing payable exists on
    // our side and the cart is untouched.
    let gateway_order = state
        .payments()
        .create_order(amount_minor, &order_number)
        .await?;

    let order_items: Vec<OrderItem> = lines
        .into_iter()
        .map(|l| OrderItem {
            product_id: l.item.product_id,
            name: l.name,
            quantity: l.item.quantity,
            size: l.item.size,
            color: l.item.color,
            unit_price: l.unit_price,
            image: l.image,
        })
        .collect();

    OrderRepository::new(state.pool())
        .create(NewOrder {
            order_number,
            user_id: user.id,
            items: order_items,
            shipping_address: ShippingAddress {
                address: body.address,
                city: body.city,
                postal_code: body.postal_code,
                country: body.country,
            },
            mobile: body.mobile,
            subtotal,
            tax,
            shipping,
            total,
            currency: currency.code().to_string(),
            gateway_order_id: gateway_order.id.clone(),
        })
        .await?;

    Ok(Json(CreateOrderResponse {
        success: true,
        order: OrderSummary {
            id: gateway_order.id,
            amount: gateway_order.amount,
            currency: gateway_order.currency,
        },
        key: state.payments().key_id().to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: String,
}

/// Verify a payment signature from the widget.
///
/// POST /payment/verify
///
/// A matching signature marks the order `paid` and clears the cart. A
/// mismatch marks the order `failed` and leaves the cart alone.
///
/// # Errors
///
/// Returns 400 for an unknown order or a signature that doesn't check out.
#[instrument(skip(state, user, body), fields(user_id = %user.id, order_id = %body.order_id))]
pub async fn verify(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>> {
    let orders = OrderRepository::new(state.pool());

    let order = orders
        .get_by_gateway_order_id(&body.order_id)
        .await?
        .filter(|o| o.user_id == user.id)
        .ok_or_else(|| AppError::BadRequest("Payment verification failed".to_string()))?;

    let valid =
        state
            .payments()
            .verify_signature(&body.order_id, &body.payment_id, &body.signature);

    if !valid {
        orders.mark_failed(order.id).await?;
        tracing::warn!(order_id = %order.id, "Payment signature mismatch");
        return Err(AppError::BadRequest(
            "Payment verification failed".to_string(),
        ));
    }

    orders.settle(order.id, order.user_id, &body.payment_id).await?;

    Ok(Json(VerifyResponse {
        success: true,
        message: "Payment verified".to_string(),
    }))
}

/// Generate a human-readable order number.
fn generate_order_number() -> String {
    use rand::Rng;
    let suffix: u32 = rand::rng().random_range(1000..10_000);
    format!("VLR-{}-{suffix}", chrono::Utc::now().format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use velour_core::{CartItemId, ProductId, UserId};

    fn cart_line(product_id: ProductId, size: &str, price: &str, quantity: i32) -> CartItem {
        CartItem {
            id: CartItemId::generate(),
            user_id: UserId::generate(),
            product_id,
            size: size.to_string(),
            color: "Ivory".to_string(),
            quantity,
            price: price.parse().unwrap(),
            created_at: Utc::now(),
        }
    }

    fn product(id: ProductId, sizes: Vec<(&str, &str)>) -> Product {
        Product {
            id,
            name: "Slip Skirt".to_string(),
            description: None,
            category_id: None,
            images: vec!["https://cdn.example/skirt.jpg".to_string()],
            sizes: sizes
                .into_iter()
                .map(|(label, price)| crate::models::SizeVariant {
                    label: label.to_string(),
                    price: price.parse().unwrap(),
                    stock: 10,
                })
                .collect(),
            colors: vec![],
            trade_price: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_variant_price_wins_over_stored_price() {
        let id = ProductId::generate();
        let lines = price_lines(
            vec![cart_line(id, "M", "400", 1)],
            &[product(id, vec![("M", "450")])],
        );

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].unit_price, "450".parse().unwrap());
    }

    #[test]
    fn test_unmatched_size_falls_back_to_stored_price() {
        let id = ProductId::generate();
        let lines = price_lines(
            vec![cart_line(id, "XXL", "400", 1)],
            &[product(id, vec![("M", "450")])],
        );

        assert_eq!(lines[0].unit_price, "400".parse().unwrap());
    }

    #[test]
    fn test_orphaned_lines_dropped_from_checkout() {
        let live = ProductId::generate();
        let gone = ProductId::generate();
        let lines = price_lines(
            vec![cart_line(live, "M", "400", 2), cart_line(gone, "M", "300", 1)],
            &[product(live, vec![("M", "450")])],
        );

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].item.product_id, live);
    }

    #[test]
    fn test_order_number_shape() {
        let number = generate_order_number();
        assert!(number.starts_with("VLR-"));
        assert!(number.len() > 10);
    }
}
