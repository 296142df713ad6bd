//! Cart repository.
//!
//! Carts are materialized lazily: a user's cart is simply their set of
//! `cart_item` rows, so "create empty cart on first access" needs no insert.
//! Line items are unique per (user, product, size, color); adding the same
//! combination again merges quantities at the database level.

use rust_decimal::Decimal;
use sqlx::PgPool;

use marigold_core::{CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartItem, ProductSummary};

#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: i32,
    quantity: i32,
    size: String,
    color: String,
    product_id: i32,
    slug: String,
    name: String,
    price: Decimal,
    images: Vec<String>,
    available_sizes: Vec<String>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            product: ProductSummary {
                id: ProductId::new(row.product_id),
                slug: row.slug,
                name: row.name,
                price: row.price,
                images: row.images,
                available_sizes: row.available_sizes,
            },
            quantity: row.quantity,
            size: row.size,
            color: row.color,
        }
    }
}

const ITEM_SELECT: &str = "SELECT ci.id, ci.quantity, ci.size, ci.color, \
     p.id AS product_id, p.slug, p.name, p.price, p.images, p.available_sizes \
     FROM cart_item ci JOIN product p ON p.id = ci.product_id";

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

    /// Fetch a user's cart with populated product summaries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        let rows: Vec<CartItemRow> =
            sqlx::query_as(&format!("{ITEM_SELECT} WHERE ci.user_id = $1 ORDER BY ci.id"))
                .bind(user_id)
                .fetch_all(self.pool)
                .await?;

        Ok(Cart::from_items(rows.into_iter().map(CartItem::from).collect()))
    }

    /// Add a line item, merging into an existing (product, size, color) line.
    ///
    /// The caller validates quantity and product existence; at this level the
    /// foreign key still backstops unknown products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
        size: &str,
        color: &str,
    ) -> Result<Cart, RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_item (user_id, product_id, quantity, size, color) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, product_id, size, color) \
             DO UPDATE SET quantity = cart_item.quantity + EXCLUDED.quantity, \
                           updated_at = now()",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(size)
        .bind(color)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        self.get(user_id).await
    }

    /// Set the quantity of an existing line item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item isn't in this user's
    /// cart.
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<Cart, RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_item SET quantity = $3, updated_at = now() \
             WHERE id = $2 AND user_id = $1",
        )
        .bind(user_id)
        .bind(item_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(user_id).await
    }

    /// Remove a line item. Removing an absent item is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<Cart, RepositoryError> {
        sqlx::query("DELETE FROM cart_item WHERE id = $2 AND user_id = $1")
            .bind(user_id)
            .bind(item_id)
            .execute(self.pool)
            .await?;

        self.get(user_id).await
    }

    /// Remove every line item from a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_item WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
