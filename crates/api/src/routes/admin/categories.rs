//! Admin category management routes.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use velour_core::CategoryId;

use crate::db::CategoryRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::routes::auth::MessageResponse;
use crate::routes::products::CategoryView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Create a category. The slug is derived from the name.
///
/// POST /admin/categories
///
/// # Errors
///
/// Returns 409 when the name or slug is taken.
#[instrument(skip(state, _admin, body), fields(name = %body.name))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<Json<CategoryView>> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    let slug = slugify(name);
    let category = CategoryRepository::new(state.pool())
        .create(name, &slug, body.description.as_deref())
        .await?;

    Ok(Json(category.into()))
}

/// Delete a category. Products keep their rows; their category reference
/// nulls out via the foreign key.
///
/// DELETE /admin/categories/{id}
///
/// # Errors
///
/// Returns 404 when the category doesn't exist.
#[instrument(skip(state, _admin))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<Json<MessageResponse>> {
    let deleted = CategoryRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Category not found".to_string()));
    }

    Ok(MessageResponse::ok("Category deleted"))
}

/// Lowercase, hyphen-separated slug from a display name.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Evening Wear"), "evening-wear");
        assert_eq!(slugify("  Silk & Satin  "), "silk-satin");
        assert_eq!(slugify("Already-Slugged"), "already-slugged");
    }
}
