//! Product repository for catalog queries and admin mutations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use marigold_core::ProductId;

use super::RepositoryError;
use crate::models::{Color, Product};

const SELECT_COLUMNS: &str = "id, slug, name, description, full_description, price, \
     original_price, images, category, subcategory, rating, review_count, is_new, \
     is_featured, available_sizes, colors, material, stock, created_at, updated_at";

/// Sort orders supported by the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    #[default]
    Newest,
    Rating,
}

impl ProductSort {
    /// Parse the query-string sort key, falling back to newest-first.
    #[must_use]
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            Some("rating") => Self::Rating,
            _ => Self::Newest,
        }
    }

    const fn order_clause(self) -> &'static str {
        match self {
            Self::PriceAsc => " ORDER BY price ASC",
            Self::PriceDesc => " ORDER BY price DESC",
            Self::Newest => " ORDER BY created_at DESC",
            Self::Rating => " ORDER BY rating DESC",
        }
    }
}

/// Filters and pagination for the product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub featured: bool,
    pub is_new: bool,
    pub sort: ProductSort,
    pub page: i64,
    pub limit: i64,
}

/// Fields for creating or replacing a product (admin only).
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub slug: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub full_description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    pub images: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i32,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub available_sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub stock: i32,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    slug: String,
    name: String,
    description: String,
    full_description: Option<String>,
    price: Decimal,
    original_price: Option<Decimal>,
    images: Vec<String>,
    category: String,
    subcategory: Option<String>,
    rating: f64,
    review_count: i32,
    is_new: bool,
    is_featured: bool,
    available_sizes: Vec<String>,
    colors: Json<Vec<Color>>,
    material: Option<String>,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            slug: row.slug,
            name: row.name,
            description: row.description,
            full_description: row.full_description,
            price: row.price,
            original_price: row.original_price,
            images: row.images,
            category: row.category,
            subcategory: row.subcategory,
            rating: row.rating,
            review_count: row.review_count,
            is_new: row.is_new,
            is_featured: row.is_featured,
            available_sizes: row.available_sizes,
            colors: row.colors.0,
            material: row.material,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
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

    /// List products matching the filter, returning the page and the total
    /// match count (for pagination envelopes).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let page = filter.page.max(1);
        let limit = filter.limit.clamp(1, 100);
        let offset = (page - 1) * limit;

        let mut query = QueryBuilder::new(format!("SELECT {SELECT_COLUMNS} FROM product"));
        push_filters(&mut query, filter);
        query.push(filter.sort.order_clause());
        query.push(" LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind(offset);

        let rows: Vec<ProductRow> = query.build_query_as().fetch_all(self.pool).await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM product");
        push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(self.pool).await?;

        Ok((rows.into_iter().map(Product::from).collect(), total))
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM product WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Featured products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn featured(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        self.flagged("is_featured", limit).await
    }

    /// New arrivals, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn new_arrivals(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        self.flagged("is_new", limit).await
    }

    async fn flagged(&self, flag: &str, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        // flag is one of two compile-time literals, never user input
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM product WHERE {flag} ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit.clamp(1, 100))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Products in the same category as `id`, excluding `id` itself.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the anchor product is unknown.
    pub async fn related(
        &self,
        id: ProductId,
        limit: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let product = self.get(id).await?.ok_or(RepositoryError::NotFound)?;

        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM product WHERE category = $1 AND id <> $2 \
             ORDER BY created_at DESC LIMIT $3"
        ))
        .bind(&product.category)
        .bind(id)
        .bind(limit.clamp(1, 100))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// All products in a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM product WHERE category = $1 ORDER BY created_at DESC"
        ))
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Create a product (admin only).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            "INSERT INTO product (slug, name, description, full_description, price, \
             original_price, images, category, subcategory, rating, review_count, \
             is_new, is_featured, available_sizes, colors, material, stock) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(input.slug.to_lowercase())
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.full_description)
        .bind(input.price)
        .bind(input.original_price)
        .bind(&input.images)
        .bind(&input.category)
        .bind(&input.subcategory)
        .bind(input.rating)
        .bind(input.review_count)
        .bind(input.is_new)
        .bind(input.is_featured)
        .bind(&input.available_sizes)
        .bind(Json(&input.colors))
        .bind(&input.material)
        .bind(input.stock)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique("slug already exists"))?;

        Ok(row.into())
    }

    /// Replace a product's fields (admin only).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE product SET slug = $2, name = $3, description = $4, \
             full_description = $5, price = $6, original_price = $7, images = $8, \
             category = $9, subcategory = $10, rating = $11, review_count = $12, \
             is_new = $13, is_featured = $14, available_sizes = $15, colors = $16, \
             material = $17, stock = $18, updated_at = now() \
             WHERE id = $1 RETURNING {SELECT_COLUMNS}"
        ))
        .bind(id)
        .bind(input.slug.to_lowercase())
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.full_description)
        .bind(input.price)
        .bind(input.original_price)
        .bind(&input.images)
        .bind(&input.category)
        .bind(&input.subcategory)
        .bind(input.rating)
        .bind(input.review_count)
        .bind(input.is_new)
        .bind(input.is_featured)
        .bind(&input.available_sizes)
        .bind(Json(&input.colors))
        .bind(&input.material)
        .bind(input.stock)
        .fetch_optional(self.pool)
        .await
        .map_err(conflict_on_unique("slug already exists"))?;

        row.map(Product::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a product (admin only).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    query.push(" WHERE TRUE");

    if let Some(category) = &filter.category {
        query.push(" AND category = ");
        query.push_bind(category.clone());
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        query.push(" AND (name ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR description ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }
    if let Some(min) = filter.min_price {
        query.push(" AND price >= ");
        query.push_bind(min);
    }
    if let Some(max) = filter.max_price {
        query.push(" AND price <= ");
        query.push_bind(max);
    }
    if filter.featured {
        query.push(" AND is_featured");
    }
    if filter.is_new {
        query.push(" AND is_new");
    }
}

fn conflict_on_unique(message: &'static str) -> impl Fn(sqlx::Error) -> RepositoryError {
    move |e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict(message.to_owned());
        }
        RepositoryError::Database(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parse() {
        assert_eq!(ProductSort::parse(Some("price_asc")), ProductSort::PriceAsc);
        assert_eq!(
            ProductSort::parse(Some("price_desc")),
            ProductSort::PriceDesc
        );
        assert_eq!(ProductSort::parse(Some("rating")), ProductSort::Rating);
        assert_eq!(ProductSort::parse(Some("newest")), ProductSort::Newest);
        // Unknown keys fall back to newest-first
        assert_eq!(ProductSort::parse(Some("bogus")), ProductSort::Newest);
        assert_eq!(ProductSort::parse(None), ProductSort::Newest);
    }
}
