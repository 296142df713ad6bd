//! Order repository.
//!
//! Creation snapshots items and addresses into the order row and seeds the
//! status history in the same transaction; when the caller asks for it, the
//! originating cart is cleared inside that transaction too, so an order can
//! never exist alongside a stale cart. Status changes go through
//! [`marigold_core::OrderStatus::transition_to`] under a row lock and append
//! exactly one history entry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use marigold_core::{OrderId, OrderStatus, OrderStatusError, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderAddress, OrderItem, PaymentResult, StatusEntry};

/// Error updating an order's status.
#[derive(Debug, thiserror::Error)]
pub enum OrderUpdateError {
    /// The state machine rejected the transition.
    #[error(transparent)]
    Status(#[from] OrderStatusError),

    /// Repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderUpdateError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Fields for creating an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub shipping_address: OrderAddress,
    pub billing_address: OrderAddress,
    pub payment_method: String,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    /// Empty the originating cart in the same transaction.
    pub clear_cart: bool,
}

const SELECT_COLUMNS: &str = "id, user_id, items, shipping_address, billing_address, \
     payment_method, subtotal, tax, shipping, total, status, tracking_number, \
     payment_result, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    items: Json<Vec<OrderItem>>,
    shipping_address: Json<OrderAddress>,
    billing_address: Json<OrderAddress>,
    payment_method: String,
    subtotal: Decimal,
    tax: Decimal,
    shipping: Decimal,
    total: Decimal,
    status: String,
    tracking_number: Option<String>,
    payment_result: Option<Json<PaymentResult>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    status: String,
    date: DateTime<Utc>,
    note: Option<String>,
}

impl OrderRow {
    fn into_order(self, history: Vec<StatusEntry>) -> Result<Order, RepositoryError> {
        let status: OrderStatus = self.status.parse().map_err(|e: OrderStatusError| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            user: UserId::new(self.user_id),
            items: self.items.0,
            shipping_address: self.shipping_address.0,
            billing_address: self.billing_address.0,
            payment_method: self.payment_method,
            subtotal: self.subtotal,
            tax: self.tax,
            shipping: self.shipping,
            total: self.total,
            status,
            status_history: history,
            tracking_number: self.tracking_number,
            payment_result: self.payment_result.map(|p| p.0),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn history_from_rows(rows: Vec<HistoryRow>) -> Result<Vec<StatusEntry>, RepositoryError> {
    rows.into_iter()
        .map(|row| {
            let status = row.status.parse().map_err(|e: OrderStatusError| {
                RepositoryError::DataCorruption(format!("invalid status in history: {e}"))
            })?;
            Ok(StatusEntry {
                status,
                date: row.date,
                note: row.note,
            })
        })
        .collect()
}

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

    /// Create an order with status `pending` and a seeded history entry.
    ///
    /// When `new.clear_cart` is set, the user's cart rows are deleted in the
    /// same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn create(&self, user_id: UserId, new: NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: OrderRow = sqlx::query_as(&format!(
            "INSERT INTO orders (user_id, items, shipping_address, billing_address, \
             payment_method, subtotal, tax, shipping, total, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending') \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(user_id)
        .bind(Json(&new.items))
        .bind(Json(&new.shipping_address))
        .bind(Json(&new.billing_address))
        .bind(&new.payment_method)
        .bind(new.subtotal)
        .bind(new.tax)
        .bind(new.shipping)
        .bind(new.total)
        .fetch_one(&mut *tx)
        .await?;

        let seed: HistoryRow = sqlx::query_as(
            "INSERT INTO order_status_history (order_id, status, note) \
             VALUES ($1, 'pending', 'Order placed') \
             RETURNING status, date, note",
        )
        .bind(row.id)
        .fetch_one(&mut *tx)
        .await?;

        if new.clear_cart {
            sqlx::query("DELETE FROM cart_item WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        row.into_order(history_from_rows(vec![seed])?)
    }

    /// Get an order by ID, with its full status history.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        match row {
            Some(row) => {
                let history = self.history(OrderId::new(row.id)).await?;
                Ok(Some(row.into_order(history)?))
            }
            None => Ok(None),
        }
    }

    /// All orders for a user, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        self.assemble(rows).await
    }

    /// Paginated order listing with an optional status filter (admin only).
    ///
    /// Returns the page and the total match count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_all(
        &self,
        status: Option<OrderStatus>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        let page = page.max(1);
        let limit = limit.clamp(1, 100);

        let mut query = QueryBuilder::new(format!("SELECT {SELECT_COLUMNS} FROM orders"));
        push_status_filter(&mut query, status);
        query.push(" ORDER BY created_at DESC LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind((page - 1) * limit);
        let rows: Vec<OrderRow> = query.build_query_as().fetch_all(self.pool).await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM orders");
        push_status_filter(&mut count, status);
        let total: i64 = count.build_query_scalar().fetch_one(self.pool).await?;

        Ok((self.assemble(rows).await?, total))
    }

    /// Apply a status transition, appending exactly one history entry.
    ///
    /// A `shipped` transition may attach a tracking number; other transitions
    /// leave any existing tracking number untouched.
    ///
    /// # Errors
    ///
    /// Returns [`OrderUpdateError::Status`] if the state machine rejects the
    /// transition, leaving the order and its history unchanged.
    pub async fn transition(
        &self,
        id: OrderId,
        next: OrderStatus,
        note: Option<String>,
        tracking_number: Option<String>,
    ) -> Result<Order, OrderUpdateError> {
        self.apply_transition(id, next, note, tracking_number, None)
            .await
    }

    /// Record a verified payment: move to `processing` with a
    /// "Payment received" note and store the provider's identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`OrderUpdateError::Status`] if the order is not in a state
    /// that can move to `processing` (e.g. a duplicate callback).
    pub async fn confirm_payment(
        &self,
        id: OrderId,
        payment: PaymentResult,
    ) -> Result<Order, OrderUpdateError> {
        self.apply_transition(
            id,
            OrderStatus::Processing,
            Some("Payment received".to_owned()),
            None,
            Some(payment),
        )
        .await
    }

    async fn apply_transition(
        &self,
        id: OrderId,
        next: OrderStatus,
        note: Option<String>,
        tracking_number: Option<String>,
        payment: Option<PaymentResult>,
    ) -> Result<Order, OrderUpdateError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let current: OrderStatus = current
            .ok_or(RepositoryError::NotFound)?
            .parse()
            .map_err(|e: OrderStatusError| {
                RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
            })?;

        current.transition_to(next)?;

        sqlx::query(
            "UPDATE orders SET status = $2, \
             tracking_number = COALESCE($3, tracking_number), \
             payment_result = COALESCE($4, payment_result), \
             updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(next.as_str())
        .bind(tracking_number)
        .bind(payment.map(Json))
        .execute(&mut *tx)
        .await?;

        let note = note.unwrap_or_else(|| format!("Status updated to {next}"));
        sqlx::query("INSERT INTO order_status_history (order_id, status, note) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(next.as_str())
            .bind(note)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get(id)
            .await?
            .ok_or(OrderUpdateError::Repository(RepositoryError::NotFound))
    }

    async fn history(&self, id: OrderId) -> Result<Vec<StatusEntry>, RepositoryError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            "SELECT status, date, note FROM order_status_history \
             WHERE order_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        history_from_rows(rows)
    }

    async fn assemble(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let history = self.history(OrderId::new(row.id)).await?;
            orders.push(row.into_order(history)?);
        }
        Ok(orders)
    }
}

fn push_status_filter(query: &mut QueryBuilder<'_, Postgres>, status: Option<OrderStatus>) {
    if let Some(status) = status {
        query.push(" WHERE status = ");
        query.push_bind(status.as_str());
    }
}
