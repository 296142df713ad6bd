//! Product catalog route handlers.
//!
//! Public reads plus admin-only catalog mutations. Slug lookups go through
//! the in-memory product cache; mutations invalidate it.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use marigold_core::ProductId;

use crate::db::RepositoryError;
use crate::db::products::{ProductFilter, ProductInput, ProductRepository, ProductSort};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Default page size for the product listing.
const DEFAULT_PAGE_SIZE: i64 = 12;

/// Default number of products on the featured/new-arrival shelves.
const DEFAULT_SHELF_SIZE: i64 = 8;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    category: Option<String>,
    search: Option<String>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    sort: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
    #[serde(default)]
    featured: bool,
    #[serde(default)]
    is_new: bool,
}

#[derive(Debug, Deserialize)]
pub struct ShelfQuery {
    limit: Option<i64>,
}

/// `GET /products` - filtered, sorted, paginated listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100);

    let filter = ProductFilter {
        category: query.category,
        search: query.search,
        min_price: query.min_price,
        max_price: query.max_price,
        featured: query.featured,
        is_new: query.is_new,
        sort: ProductSort::parse(query.sort.as_deref()),
        page,
        limit,
    };

    let (products, total) = ProductRepository::new(state.pool()).list(&filter).await?;
    let total_pages = total.cast_unsigned().div_ceil(limit.cast_unsigned());

    Ok(Json(json!({
        "success": true,
        "count": products.len(),
        "total": total,
        "totalPages": total_pages,
        "currentPage": page,
        "products": products,
    })))
}

/// `GET /products/{id}` - product detail by ID.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;

    Ok(Json(json!({ "success": true, "product": product })))
}

/// `GET /products/slug/{slug}` - product detail by slug, cached.
#[instrument(skip(state))]
pub async fn show_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    if let Some(product) = state.product_cache().get(&slug).await {
        return Ok(Json(json!({ "success": true, "product": product })));
    }

    let product = ProductRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;

    state
        .product_cache()
        .insert(slug, product.clone())
        .await;

    Ok(Json(json!({ "success": true, "product": product })))
}

/// `GET /products/featured/list` - featured shelf.
#[instrument(skip(state))]
pub async fn featured(
    State(state): State<AppState>,
    Query(query): Query<ShelfQuery>,
) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool())
        .featured(query.limit.unwrap_or(DEFAULT_SHELF_SIZE))
        .await?;

    Ok(Json(json!({ "success": true, "products": products })))
}

/// `GET /products/new/arrivals` - new-arrival shelf.
#[instrument(skip(state))]
pub async fn new_arrivals(
    State(state): State<AppState>,
    Query(query): Query<ShelfQuery>,
) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool())
        .new_arrivals(query.limit.unwrap_or(DEFAULT_SHELF_SIZE))
        .await?;

    Ok(Json(json!({ "success": true, "products": products })))
}

/// `GET /products/{id}/related` - same-category products.
#[instrument(skip(state))]
pub async fn related(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool())
        .related(ProductId::new(id), DEFAULT_SHELF_SIZE)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product".to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(Json(json!({ "success": true, "products": products })))
}

/// `GET /products/category/{category}` - full category listing.
#[instrument(skip(state))]
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse> {
    let products = ProductRepository::new(state.pool())
        .by_category(&category)
        .await?;

    Ok(Json(json!({ "success": true, "products": products })))
}

/// `POST /products` - create a product (admin).
#[instrument(skip(state, input))]
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<impl IntoResponse> {
    let product = ProductRepository::new(state.pool()).create(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "product": product })),
    ))
}

/// `PUT /products/{id}` - replace a product (admin).
#[instrument(skip(state, input))]
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<ProductInput>,
) -> Result<impl IntoResponse> {
    let repo = ProductRepository::new(state.pool());
    let id = ProductId::new(id);

    // Invalidate the old slug too in case the edit renamed it.
    if let Some(existing) = repo.get(id).await? {
        state.invalidate_product(&existing.slug).await;
    }

    let product = repo.update(id, &input).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::NotFound("Product".to_owned()),
        other => AppError::Database(other),
    })?;
    state.invalidate_product(&product.slug).await;

    Ok(Json(json!({ "success": true, "product": product })))
}

/// `DELETE /products/{id}` - delete a product (admin).
#[instrument(skip(state))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let repo = ProductRepository::new(state.pool());
    let id = ProductId::new(id);

    if let Some(existing) = repo.get(id).await? {
        state.invalidate_product(&existing.slug).await;
    }

    repo.delete(id).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::NotFound("Product".to_owned()),
        other => AppError::Database(other),
    })?;

    Ok(Json(json!({ "success": true, "message": "Product deleted" })))
}
