//! Product repository for database operations.
//!
//! Products are stored across three tables: `products` plus the
//! `product_sizes` and `product_colors` variant tables. The repository
//! assembles them into [`Product`] values.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use velour_core::{CategoryId, ProductId};

use super::RepositoryError;
use crate::models::{ColorVariant, Product, SizeVariant};

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: Option<String>,
    category_id: Option<CategoryId>,
    images: Vec<String>,
    trade_price: Option<Decimal>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct SizeRow {
    product_id: ProductId,
    label: String,
    price: Decimal,
    stock: i32,
}

#[derive(sqlx::FromRow)]
struct ColorRow {
    product_id: ProductId,
    label: String,
}

/// Parameters for creating or replacing a product.
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub images: Vec<String>,
    pub sizes: Vec<SizeVariant>,
    pub colors: Vec<ColorVariant>,
    pub trade_price: Option<Decimal>,
}

/// Filters for product listing.
#[derive(Default)]
pub struct ProductFilter {
    pub category_id: Option<CategoryId>,
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products, newest first, with optional filters.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let search_pattern = filter
            .search
            .as_ref()
            .map(|s| format!("%{}%", escape_like(s)));

        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, category_id, images, trade_price,
                   active, created_at, updated_at
            FROM products
            WHERE active
              AND ($1::uuid IS NULL OR category_id = $1)
              AND ($2::text IS NULL OR name ILIKE $2)
            ORDER BY created_at DESC
            ",
        )
        .bind(filter.category_id)
        .bind(search_pattern)
        .fetch_all(self.pool)
        .await?;

        self.assemble(rows).await
    }

    /// Get a product by ID, including inactive ones.
    ///
    /// Callers that must not see soft-deleted products check `active`
    /// themselves; cart and order code needs the row either way.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, category_id, images, trade_price,
                   active, created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    /// Get several products by ID (used by cart retrieval).
    ///
    /// Missing or inactive products are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_active_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| id.as_uuid()).collect();
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, category_id, images, trade_price,
                   active, created_at, updated_at
            FROM products
            WHERE active AND id = ANY($1)
            ",
        )
        .bind(&uuids)
        .fetch_all(self.pool)
        .await?;

        self.assemble(rows).await
    }

    /// Create a new product with its variants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails.
    pub async fn create(&self, input: ProductInput) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let id = ProductId::generate();

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (id, name, description, category_id, images, trade_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, category_id, images, trade_price,
                      active, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.category_id)
        .bind(&input.images)
        .bind(input.trade_price)
        .fetch_one(&mut *tx)
        .await?;

        insert_variants(&mut tx, id, &input.sizes, &input.colors).await?;
        tx.commit().await?;

        Ok(Product {
            id: row.id,
            name: row.name,
            description: row.description,
            category_id: row.category_id,
            images: row.images,
            sizes: input.sizes,
            colors: input.colors,
            trade_price: row.trade_price,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Replace a product's fields and variants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        input: ProductInput,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET name = $2, description = $3, category_id = $4, images = $5,
                trade_price = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, category_id, images, trade_price,
                      active, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.category_id)
        .bind(&input.images)
        .bind(input.trade_price)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        sqlx::query("DELETE FROM product_sizes WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM product_colors WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_variants(&mut tx, id, &input.sizes, &input.colors).await?;
        tx.commit().await?;

        Ok(Product {
            id: row.id,
            name: row.name,
            description: row.description,
            category_id: row.category_id,
            images: row.images,
            sizes: input.sizes,
            colors: input.colors,
            trade_price: row.trade_price,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    /// Soft-delete a product.
    ///
    /// The row stays so order history and cart lines keep a referent; cart
    /// retrieval reports the line as orphaned from here on.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product existed and was active.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn soft_delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET active = FALSE, updated_at = NOW()
            WHERE id = $1 AND active
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Attach size and color variants to a set of product rows.
    async fn assemble(&self, rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
        let uuids: Vec<uuid::Uuid> = rows.iter().map(|r| r.id.as_uuid()).collect();

        let sizes = sqlx::query_as::<_, SizeRow>(
            r"
            SELECT product_id, label, price, stock
            FROM product_sizes
            WHERE product_id = ANY($1)
            ORDER BY position ASC
            ",
        )
        .bind(&uuids)
        .fetch_all(self.pool)
        .await?;

        let colors = sqlx::query_as::<_, ColorRow>(
            r"
            SELECT product_id, label
            FROM product_colors
            WHERE product_id = ANY($1)
            ORDER BY position ASC
            ",
        )
        .bind(&uuids)
        .fetch_all(self.pool)
        .await?;

        let mut products: Vec<Product> = rows
            .into_iter()
            .map(|row| Product {
                id: row.id,
                name: row.name,
                description: row.description,
                category_id: row.category_id,
                images: row.images,
                sizes: Vec::new(),
                colors: Vec::new(),
                trade_price: row.trade_price,
                active: row.active,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect();

        for size in sizes {
            if let Some(product) = products.iter_mut().find(|p| p.id == size.product_id) {
                product.sizes.push(SizeVariant {
                    label: size.label,
                    price: size.price,
                    stock: size.stock,
                });
            }
        }
        for color in colors {
            if let Some(product) = products.iter_mut().find(|p| p.id == color.product_id) {
                product.colors.push(ColorVariant { label: color.label });
            }
        }

        Ok(products)
    }
}

/// Insert variant rows for a product inside an open transaction.
async fn insert_variants(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: ProductId,
    sizes: &[SizeVariant],
    colors: &[ColorVariant],
) -> Result<(), RepositoryError> {
    for (position, size) in sizes.iter().enumerate() {
        sqlx::query(
            r"
            INSERT INTO product_sizes (product_id, label, price, stock, position)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(product_id)
        .bind(&size.label)
        .bind(size.price)
        .bind(size.stock)
        .bind(i32::try_from(position).unwrap_or(i32::MAX))
        .execute(&mut **tx)
        .await?;
    }

    for (position, color) in colors.iter().enumerate() {
        sqlx::query(
            r"
            INSERT INTO product_colors (product_id, label, position)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(product_id)
        .bind(&color.label)
        .bind(i32::try_from(position).unwrap_or(i32::MAX))
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Escape `%` and `_` so user input can't widen an ILIKE pattern.
fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
