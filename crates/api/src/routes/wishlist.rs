//! Wishlist routes.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use velour_core::ProductId;

use crate::db::{ProductRepository, WishlistRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::routes::auth::MessageResponse;
use crate::routes::products::ProductView;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub success: bool,
    pub items: Vec<ProductView>,
}

/// The caller's wishlist, joined against live products.
///
/// GET /users/wishlist
///
/// # Errors
///
/// Returns 401 without a user token.
pub async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<WishlistResponse>> {
    let product_ids = WishlistRepository::new(state.pool()).list(user.id).await?;
    let mut products = ProductRepository::new(state.pool())
        .get_active_by_ids(&product_ids)
        .await?;

    // Preserve most-recently-added-first ordering from the wishlist.
    products.sort_by_key(|p| product_ids.iter().position(|id| *id == p.id));

    Ok(Json(WishlistResponse {
        success: true,
        items: products
            .into_iter()
            .map(|p| ProductView::from_product(p, false))
            .collect(),
    }))
}

/// Add a product to the wishlist. Adding twice is a no-op.
///
/// POST /users/wishlist/{product_id}
///
/// # Errors
///
/// Returns 404 for unknown or deactivated products.
pub async fn add(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<MessageResponse>> {
    let exists = ProductRepository::new(state.pool())
        .get_by_id(product_id)
        .await?
        .is_some_and(|p| p.active);
    if !exists {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    WishlistRepository::new(state.pool())
        .add(user.id, product_id)
        .await?;

    Ok(MessageResponse::ok("Added to wishlist"))
}

/// Remove a product from the wishlist.
///
/// DELETE /users/wishlist/{product_id}
///
/// # Errors
///
/// Returns 404 when the product wasn't on the wishlist.
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<MessageResponse>> {
    let removed = WishlistRepository::new(state.pool())
        .remove(user.id, product_id)
        .await?;
    if !removed {
        return Err(AppError::NotFound("Not on your wishlist".to_string()));
    }

    Ok(MessageResponse::ok("Removed from wishlist"))
}
