//! Cart repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use velour_core::{CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::CartItem;

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's cart lines, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<CartItem>, RepositoryError> {
        let items = sqlx::query_as::<_, CartItem>(
            r"
            SELECT id, user_id, product_id, size, color, quantity, price, created_at
            FROM cart_items
            WHERE user_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Add a line to the cart, or bump quantity if the same product, size,
    /// and color is already present. The captured price is not rewritten on
    /// the bump; the original add-time price stands.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn upsert(
        &self,
        user_id: UserId,
        product_id: ProductId,
        size: &str,
        color: &str,
        quantity: i32,
        price: Decimal,
    ) -> Result<CartItem, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(
            r"
            INSERT INTO cart_items (id, user_id, product_id, size, color, quantity, price)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id, product_id, size, color) DO UPDATE
            SET quantity = cart_items.quantity + EXCLUDED.quantity
            RETURNING id, user_id, product_id, size, color, quantity, price, created_at
            ",
        )
        .bind(CartItemId::generate())
        .bind(user_id)
        .bind(product_id)
        .bind(size)
        .bind(color)
        .bind(quantity)
        .bind(price)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Set the quantity of a line the user owns.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist or
    /// belongs to someone else.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(
            r"
            UPDATE cart_items
            SET quantity = $3
            WHERE id = $2 AND user_id = $1
            RETURNING id, user_id, product_id, size, color, quantity, price, created_at
            ",
        )
        .bind(user_id)
        .bind(item_id)
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(item)
    }

    /// Remove a single line the user owns.
    ///
    /// # Returns
    ///
    /// Returns `true` if a line was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $2 AND user_id = $1")
            .bind(user_id)
            .bind(item_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Clear the user's entire cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
