//! Admin product management routes.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use velour_core::{CategoryId, ProductId};

use crate::db::products::ProductInput;
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{ColorVariant, SizeVariant};
use crate::routes::auth::MessageResponse;
use crate::routes::products::ProductView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductBody {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<SizeVariant>,
    #[serde(default)]
    pub colors: Vec<ColorVariant>,
    pub trade_price: Option<Decimal>,
}

impl ProductBody {
    fn into_input(self) -> Result<ProductInput> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("Name is required".to_string()));
        }
        if self.sizes.is_empty() {
            return Err(AppError::BadRequest(
                "At least one size variant is required".to_string(),
            ));
        }
        for size in &self.sizes {
            if size.price < Decimal::ZERO || size.stock < 0 {
                return Err(AppError::BadRequest(
                    "Size price and stock must be non-negative".to_string(),
                ));
            }
        }

        Ok(ProductInput {
            name,
            description: self.description,
            category_id: self.category,
            images: self.images,
            sizes: self.sizes,
            colors: self.colors,
            trade_price: self.trade_price,
        })
    }
}

/// Create a product.
///
/// POST /admin/products
///
/// # Errors
///
/// Returns 400 for invalid variant data.
#[instrument(skip(state, _admin, body), fields(name = %body.name))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<ProductBody>,
) -> Result<Json<ProductView>> {
    let product = ProductRepository::new(state.pool())
        .create(body.into_input()?)
        .await?;

    Ok(Json(ProductView::from_product(product, true)))
}

/// Replace a product's fields and variants.
///
/// PUT /admin/products/{id}
///
/// # Errors
///
/// Returns 404 when the product doesn't exist.
#[instrument(skip(state, _admin, body))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductBody>,
) -> Result<Json<ProductView>> {
    let product = ProductRepository::new(state.pool())
        .update(id, body.into_input()?)
        .await?;

    Ok(Json(ProductView::from_product(product, true)))
}

/// Soft-delete a product. The row stays so order history and cart lines
/// keep a referent; cart retrieval reports it as removed.
///
/// DELETE /admin/products/{id}
///
/// # Errors
///
/// Returns 404 when the product doesn't exist.
#[instrument(skip(state, _admin))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<MessageResponse>> {
    let deleted = ProductRepository::new(state.pool()).soft_delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    Ok(MessageResponse::ok("Product deleted"))
}
