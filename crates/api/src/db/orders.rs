//! Order repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use velour_core::{OrderId, PaymentStatus, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, ShippingAddress};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    order_number: String,
    user_id: UserId,
    address: String,
    city: String,
    postal_code: String,
    country: String,
    mobile: String,
    subtotal: Decimal,
    tax: Decimal,
    shipping: Decimal,
    total: Decimal,
    currency: String,
    payment_status: PaymentStatus,
    gateway_order_id: Option<String>,
    gateway_payment_id: Option<String>,
    delivered: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_id: OrderId,
    product_id: velour_core::ProductId,
    name: String,
    quantity: i32,
    size: String,
    color: String,
    unit_price: Decimal,
    image: Option<String>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            order_number: self.order_number,
            user_id: self.user_id,
            items,
            shipping_address: ShippingAddress {
                address: self.address,
                city: self.city,
                postal_code: self.postal_code,
                country: self.country,
            },
            mobile: self.mobile,
            subtotal: self.subtotal,
            tax: self.tax,
            shipping: self.shipping,
            total: self.total,
            currency: self.currency,
            payment_status: self.payment_status,
            gateway_order_id: self.gateway_order_id,
            gateway_payment_id: self.gateway_payment_id,
            delivered: self.delivered,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Parameters for persisting a new order at checkout.
pub struct NewOrder {
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
    pub gateway_order_id: String,
}

const SELECT_ORDER: &str = r"
    SELECT id, order_number, user_id, address, city, postal_code, country,
           mobile, subtotal, tax, shipping, total, currency, payment_status,
           gateway_order_id, gateway_payment_id, delivered, created_at, updated_at
    FROM orders
";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new order and its line items in `created` state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails.
    pub async fn create(&self, new_order: NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let id = OrderId::generate();

        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (id, order_number, user_id, address, city, postal_code,
                                country, mobile, subtotal, tax, shipping, total,
                                currency, gateway_order_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, order_number, user_id, address, city, postal_code, country,
                      mobile, subtotal, tax, shipping, total, currency, payment_status,
                      gateway_order_id, gateway_payment_id, delivered, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&new_order.order_number)
        .bind(new_order.user_id)
        .bind(&new_order.shipping_address.address)
        .bind(&new_order.shipping_address.city)
        .bind(&new_order.shipping_address.postal_code)
        .bind(&new_order.shipping_address.country)
        .bind(&new_order.mobile)
        .bind(new_order.subtotal)
        .bind(new_order.tax)
        .bind(new_order.shipping)
        .bind(new_order.total)
        .bind(&new_order.currency)
        .bind(&new_order.gateway_order_id)
        .fetch_one(&mut *tx)
        .await?;

        for item in &new_order.items {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, name, quantity,
                                         size, color, unit_price, image)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ",
            )
            .bind(id)
            .bind(item.product_id)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(&item.size)
            .bind(&item.color)
            .bind(item.unit_price)
            .bind(&item.image)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(row.into_order(new_order.items))
    }

    /// Look up an order by the payment gateway's order id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let row =
            sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} WHERE gateway_order_id = $1"))
                .bind(gateway_order_id)
                .fetch_optional(self.pool)
                .await?;

        match row {
            Some(row) => {
                let items = self.items_for(&[row.id]).await?;
                Ok(Some(row.into_order(items)))
            }
            None => Ok(None),
        }
    }

    /// Settle an order: mark it paid, record the gateway payment id, and
    /// clear the owning user's cart, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn settle(
        &self,
        order_id: OrderId,
        user_id: UserId,
        gateway_payment_id: &str,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE orders
            SET payment_status = 'paid', gateway_payment_id = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(order_id)
        .bind(gateway_payment_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Mark an order's payment as failed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn mark_failed(&self, order_id: OrderId) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE orders
            SET payment_status = 'failed', updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(order_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// List all orders, newest first, with their line items.
    ///
    /// The admin dashboard paginates client-side, so this returns the full
    /// collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{SELECT_ORDER} ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<OrderId> = rows.iter().map(|r| r.id).collect();
        let mut all_items = self.items_grouped(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = all_items.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect())
    }

    /// Toggle an order's delivered flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn toggle_delivered(&self, order_id: OrderId) -> Result<bool, RepositoryError> {
        let row = sqlx::query_as::<_, (bool,)>(
            r"
            UPDATE orders
            SET delivered = NOT delivered, updated_at = NOW()
            WHERE id = $1
            RETURNING delivered
            ",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.0)
    }

    async fn items_for(&self, order_ids: &[OrderId]) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = self.item_rows(order_ids).await?;
        Ok(rows.into_iter().map(item_from_row).collect())
    }

    async fn items_grouped(
        &self,
        order_ids: &[OrderId],
    ) -> Result<std::collections::HashMap<OrderId, Vec<OrderItem>>, RepositoryError> {
        let rows = self.item_rows(order_ids).await?;
        let mut grouped: std::collections::HashMap<OrderId, Vec<OrderItem>> =
            std::collections::HashMap::new();
        for row in rows {
            let order_id = row.order_id;
            grouped.entry(order_id).or_default().push(item_from_row(row));
        }
        Ok(grouped)
    }

    async fn item_rows(&self, order_ids: &[OrderId]) -> Result<Vec<OrderItemRow>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<uuid::Uuid> = order_ids.iter().map(|id| id.as_uuid()).collect();
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT order_id, product_id, name, quantity, size, color, unit_price, image
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY name ASC
            ",
        )
        .bind(&uuids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}

fn item_from_row(row: OrderItemRow) -> OrderItem {
    OrderItem {
        product_id: row.product_id,
        name: row.name,
        quantity: row.quantity,
        size: row.size,
        color: row.color,
        unit_price: row.unit_price,
        image: row.image,
    }
}
