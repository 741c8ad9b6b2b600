//! Public catalog routes.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use velour_core::{CategoryId, ProductId};

use crate::db::products::ProductFilter;
use crate::db::{CategoryRepository, ProductRepository, TraderRepository};
use crate::error::{AppError, Result};
use crate::middleware::OptionalUser;
use crate::models::{Category, ColorVariant, Product, SizeVariant};
use crate::state::AppState;

/// Public view of a product.
///
/// `trade_price` is only present for approved traders; everyone else gets
/// the field omitted entirely.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<CategoryId>,
    pub images: Vec<String>,
    pub sizes: Vec<SizeVariant>,
    pub colors: Vec<ColorVariant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_price: Option<Decimal>,
}

impl ProductView {
    pub(crate) fn from_product(product: Product, include_trade_price: bool) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            category: product.category_id,
            images: product.images,
            sizes: product.sizes,
            colors: product.colors,
            trade_price: include_trade_price
                .then_some(product.trade_price)
                .flatten(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryView {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
        }
    }
}

/// List categories.
///
/// GET /categories
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryView>>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<CategoryId>,
    pub search: Option<String>,
}

/// List active products, optionally filtered by category or name search.
///
/// GET /products
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let include_trade_price = is_approved_trader(&state, user.as_ref()).await?;

    let products = ProductRepository::new(state.pool())
        .list(&ProductFilter {
            category_id: query.category,
            search: query.search,
        })
        .await?;

    Ok(Json(
        products
            .into_iter()
            .map(|p| ProductView::from_product(p, include_trade_price))
            .collect(),
    ))
}

/// Product detail.
///
/// GET /products/{id}
///
/// # Errors
///
/// Returns 404 for unknown or deactivated products.
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let include_trade_price = is_approved_trader(&state, user.as_ref()).await?;

    let product = ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(ProductView::from_product(product, include_trade_price)))
}

/// Whether the caller's email belongs to an approved trader.
async fn is_approved_trader(
    state: &AppState,
    user: Option<&crate::models::User>,
) -> Result<bool> {
    let Some(user) = user else {
        return Ok(false);
    };

    Ok(TraderRepository::new(state.pool())
        .is_approved_email(user.email.as_str())
        .await?)
}
