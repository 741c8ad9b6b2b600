//! Cart routes.
//!
//! Cart lines keep the price captured when the line was added; product
//! data is joined live on retrieval. Lines whose product has since been
//! deactivated come back with `product: null` and are excluded from the
//! total, with `removed_count` telling the client how many were dropped.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use velour_core::{CartItemId, ProductId};

use crate::db::{CartRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::{CartItem, Product};
use crate::routes::auth::MessageResponse;
use crate::routes::products::ProductView;
use crate::state::AppState;

/// A cart line joined against its live product.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    #[serde(rename = "_id")]
    pub id: CartItemId,
    /// `null` when the product has been removed from the catalog.
    pub product: Option<ProductView>,
    pub size: String,
    pub color: String,
    pub quantity: i32,
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub success: bool,
    pub items: Vec<CartLineView>,
    /// Σ price × quantity over lines whose product is still live.
    pub total: Decimal,
    /// Number of lines whose product has been removed since they were added.
    pub removed_count: usize,
}

/// Assemble the cart response from lines and their surviving products.
fn build_cart_response(items: Vec<CartItem>, products: Vec<Product>) -> CartResponse {
    let by_id: HashMap<ProductId, Product> =
        products.into_iter().map(|p| (p.id, p)).collect();

    let mut total = Decimal::ZERO;
    let mut removed_count = 0;

    let items = items
        .into_iter()
        .map(|item| {
            // Several lines can reference the same product (one per size or
            // color), so the lookup must not consume the entry.
            let product = by_id.get(&item.product_id).cloned();
            if product.is_some() {
                total += item.price * Decimal::from(item.quantity);
            } else {
                removed_count += 1;
            }
            CartLineView {
                id: item.id,
                product: product.map(|p| ProductView::from_product(p, false)),
                size: item.size,
                color: item.color,
                quantity: item.quantity,
                price: item.price,
            }
        })
        .collect();

    CartResponse {
        success: true,
        items,
        total,
        removed_count,
    }
}

/// Cart with live product data.
///
/// GET /cart
///
/// # Errors
///
/// Returns 401 without a user token.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<CartResponse>> {
    let items = CartRepository::new(state.pool()).list(user.id).await?;

    let product_ids: Vec<ProductId> = items.iter().map(|i| i.product_id).collect();
    let products = ProductRepository::new(state.pool())
        .get_active_by_ids(&product_ids)
        .await?;

    Ok(Json(build_cart_response(items, products)))
}

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product: ProductId,
    pub size: String,
    pub color: String,
    pub quantity: i32,
}

/// Add a line to the cart.
///
/// POST /cart
///
/// The current price of the matching size variant is captured onto the
/// line. Adding the same product, size, and color again bumps quantity.
///
/// # Errors
///
/// Returns 404 for unknown products, 400 for an unknown size or a
/// non-positive quantity.
#[instrument(skip(state, user, body), fields(user_id = %user.id, product_id = %body.product))]
pub async fn add(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>> {
    if body.quantity <= 0 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .get_by_id(body.product)
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let price = product
        .price_for_size(&body.size)
        .ok_or_else(|| AppError::BadRequest("Unknown size for this product".to_string()))?;

    let carts = CartRepository::new(state.pool());
    carts
        .upsert(
            user.id,
            product.id,
            &body.size,
            &body.color,
            body.quantity,
            price,
        )
        .await?;

    refreshed_cart(&state, user.id).await
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

/// Update a line's quantity.
///
/// PUT /cart/{id}
///
/// # Errors
///
/// Returns 400 for a non-positive quantity, 404 for someone else's line.
pub async fn update(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<CartItemId>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>> {
    if body.quantity <= 0 {
        return Err(AppError::BadRequest(
            "Quantity must be at least 1".to_string(),
        ));
    }

    CartRepository::new(state.pool())
        .set_quantity(user.id, id, body.quantity)
        .await?;

    refreshed_cart(&state, user.id).await
}

/// Remove a line.
///
/// DELETE /cart/{id}
///
/// # Errors
///
/// Returns 404 when the line doesn't exist or belongs to someone else.
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<CartItemId>,
) -> Result<Json<CartResponse>> {
    let removed = CartRepository::new(state.pool()).remove(user.id, id).await?;
    if !removed {
        return Err(AppError::NotFound("Cart item not found".to_string()));
    }

    refreshed_cart(&state, user.id).await
}

/// Clear the cart.
///
/// DELETE /cart
///
/// # Errors
///
/// Returns 401 without a user token.
pub async fn clear(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<MessageResponse>> {
    CartRepository::new(state.pool()).clear(user.id).await?;
    Ok(MessageResponse::ok("Cart cleared"))
}

/// Re-fetch the cart after a mutation so clients can replace local state.
async fn refreshed_cart(
    state: &AppState,
    user_id: velour_core::UserId,
) -> Result<Json<CartResponse>> {
    let items = CartRepository::new(state.pool()).list(user_id).await?;
    let product_ids: Vec<ProductId> = items.iter().map(|i| i.product_id).collect();
    let products = ProductRepository::new(state.pool())
        .get_active_by_ids(&product_ids)
        .await?;

    Ok(Json(build_cart_response(items, products)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;
    use velour_core::UserId;

    fn line(product_id: ProductId, size: &str, price: &str, quantity: i32) -> CartItem {
        CartItem {
            id: CartItemId::generate(),
            user_id: UserId::new(Uuid::nil()),
            product_id,
            size: size.to_string(),
            color: "Black".to_string(),
            quantity,
            price: price.parse().unwrap(),
            created_at: Utc::now(),
        }
    }

    fn live_product(id: ProductId) -> Product {
        Product {
            id,
            name: "Wrap Dress".to_string(),
            description: None,
            category_id: None,
            images: vec![],
            sizes: vec![],
            colors: vec![],
            trade_price: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_total_excludes_orphaned_lines() {
        let live_id = ProductId::generate();
        let gone_id = ProductId::generate();

        let items = vec![line(live_id, "M", "450", 2), line(gone_id, "M", "300", 1)];
        let response = build_cart_response(items, vec![live_product(live_id)]);

        assert_eq!(response.total, "900".parse().unwrap());
        assert_eq!(response.removed_count, 1);
        assert_eq!(response.items.len(), 2);
        assert!(response.items[0].product.is_some());
        assert!(response.items[1].product.is_none());
    }

    #[test]
    fn test_same_product_in_two_sizes_keeps_both_lines() {
        let product_id = ProductId::generate();

        let items = vec![
            line(product_id, "M", "450", 1),
            line(product_id, "L", "450", 1),
        ];
        let response = build_cart_response(items, vec![live_product(product_id)]);

        assert_eq!(response.removed_count, 0);
        assert_eq!(response.total, "900".parse().unwrap());
        assert!(response.items.iter().all(|l| l.product.is_some()));
    }

    #[test]
    fn test_empty_cart_response() {
        let response = build_cart_response(vec![], vec![]);
        assert_eq!(response.total, Decimal::ZERO);
        assert_eq!(response.removed_count, 0);
        assert!(response.items.is_empty());
    }
}
