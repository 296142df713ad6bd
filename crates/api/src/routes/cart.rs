//! Cart route handlers.
//!
//! All cart routes require a logged-in user; the cart itself is created
//! lazily on first read.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use marigold_core::{CartItemId, ProductId};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemBody {
    product_id: i32,
    quantity: i32,
    size: String,
    color: String,
}

#[derive(Debug, Deserialize)]
pub struct QuantityBody {
    quantity: i32,
}

fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity < 1 {
        return Err(AppError::Validation(
            "Quantity must be at least 1".to_owned(),
        ));
    }
    Ok(())
}

/// `GET /cart` - the current user's cart.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let cart = CartRepository::new(state.pool()).get(user.id).await?;

    Ok(Json(json!({ "success": true, "cart": cart })))
}

/// `POST /cart/add` - add a line item, merging duplicates.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn add(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<AddItemBody>,
) -> Result<impl IntoResponse> {
    validate_quantity(body.quantity)?;

    let cart = CartRepository::new(state.pool())
        .add_item(
            user.id,
            ProductId::new(body.product_id),
            body.quantity,
            &body.size,
            &body.color,
        )
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product".to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(Json(json!({ "success": true, "cart": cart })))
}

/// `PUT /cart/update/{item_id}` - set a line item's quantity.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
    Json(body): Json<QuantityBody>,
) -> Result<impl IntoResponse> {
    validate_quantity(body.quantity)?;

    let cart = CartRepository::new(state.pool())
        .update_quantity(user.id, CartItemId::new(item_id), body.quantity)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Cart item".to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(Json(json!({ "success": true, "cart": cart })))
}

/// `DELETE /cart/remove/{item_id}` - remove a line item.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn remove(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> Result<impl IntoResponse> {
    let cart = CartRepository::new(state.pool())
        .remove_item(user.id, CartItemId::new(item_id))
        .await?;

    Ok(Json(json!({ "success": true, "cart": cart })))
}

/// `DELETE /cart/clear` - empty the cart.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn clear(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    CartRepository::new(state.pool()).clear(user.id).await?;

    Ok(Json(json!({ "success": true, "message": "Cart cleared" })))
}
