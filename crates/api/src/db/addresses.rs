//! Saved-address repository.
//!
//! Each user keeps at most one address per kind (shipping or billing), so
//! writes are upserts keyed on (user, kind). The default flag is maintained
//! transactionally: marking an address default unsets any other default of
//! the same kind.

use sqlx::PgPool;

use marigold_core::{AddressId, UserId};

use super::RepositoryError;
use crate::models::{AddressKind, StoredAddress};

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: i32,
    kind: String,
    street: String,
    city: String,
    state: String,
    zip_code: String,
    country: String,
    is_default: bool,
}

impl AddressRow {
    fn into_address(self) -> Result<StoredAddress, RepositoryError> {
        let kind: AddressKind = self.kind.parse().map_err(|e: String| {
            RepositoryError::DataCorruption(format!("invalid address type in database: {e}"))
        })?;

        Ok(StoredAddress {
            id: AddressId::new(self.id),
            kind,
            street: self.street,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            country: self.country,
            is_default: self.is_default,
        })
    }
}

const SELECT_COLUMNS: &str = "id, kind, street, city, state, zip_code, country, is_default";

/// Fields for saving an address.
#[derive(Debug, Clone)]
pub struct AddressInput {
    pub kind: AddressKind,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub is_default: bool,
}

/// Repository for saved-address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All saved addresses for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<StoredAddress>, RepositoryError> {
        let rows: Vec<AddressRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM address WHERE user_id = $1 ORDER BY kind"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(AddressRow::into_address).collect()
    }

    /// Insert or replace the user's address of the given kind.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn upsert(
        &self,
        user_id: UserId,
        input: AddressInput,
    ) -> Result<StoredAddress, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if input.is_default {
            sqlx::query(
                "UPDATE address SET is_default = FALSE \
                 WHERE user_id = $1 AND kind = $2 AND is_default",
            )
            .bind(user_id)
            .bind(input.kind.as_str())
            .execute(&mut *tx)
            .await?;
        }

        let row: AddressRow = sqlx::query_as(&format!(
            "INSERT INTO address (user_id, kind, street, city, state, zip_code, country, is_default) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (user_id, kind) \
             DO UPDATE SET street = EXCLUDED.street, city = EXCLUDED.city, \
                           state = EXCLUDED.state, zip_code = EXCLUDED.zip_code, \
                           country = EXCLUDED.country, is_default = EXCLUDED.is_default, \
                           updated_at = now() \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(user_id)
        .bind(input.kind.as_str())
        .bind(&input.street)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.zip_code)
        .bind(&input.country)
        .bind(input.is_default)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        row.into_address()
    }

    /// Delete a saved address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address isn't this user's.
    pub async fn delete(&self, user_id: UserId, id: AddressId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM address WHERE id = $2 AND user_id = $1")
            .bind(user_id)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
