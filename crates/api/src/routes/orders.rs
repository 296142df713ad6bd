//! Order route handlers.
//!
//! Placement goes through the checkout service; status changes go through
//! the order state machine. Customers see only their own orders, admins see
//! everything.

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

use marigold_core::{OrderId, OrderStatus};

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{CurrentUser, Order, OrderAddress, OrderItem};
use crate::services::{CheckoutService, PlaceOrder};
use crate::state::AppState;

/// Default page size for the admin order listing.
const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBody {
    items: Vec<OrderItem>,
    shipping_address: OrderAddress,
    #[serde(default)]
    billing_address: Option<OrderAddress>,
    payment_method: String,
    subtotal: Decimal,
    tax: Decimal,
    shipping: Decimal,
    total: Decimal,
    #[serde(default = "default_clear_cart")]
    clear_cart: bool,
}

const fn default_clear_cart() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    status: String,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    tracking_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CancelBody {
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    status: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

/// Fetch an order the user is allowed to see: their own, or any if admin.
pub(crate) async fn load_owned(
    state: &AppState,
    user: &CurrentUser,
    id: OrderId,
) -> Result<Order> {
    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_owned()))?;

    if order.user != user.id && !user.is_admin() {
        return Err(AppError::Forbidden(
            "You do not have permission to view this order.".to_owned(),
        ));
    }

    Ok(order)
}

/// `POST /orders` - place an order.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CreateOrderBody>,
) -> Result<impl IntoResponse> {
    let order = CheckoutService::new(state.pool())
        .place_order(
            user.id,
            PlaceOrder {
                items: body.items,
                shipping_address: body.shipping_address,
                billing_address: body.billing_address,
                payment_method: body.payment_method,
                subtotal: body.subtotal,
                tax: body.tax,
                shipping: body.shipping,
                total: body.total,
                clear_cart: body.clear_cart,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "order": order })),
    ))
}

/// `GET /orders/my-orders` - the current user's orders, newest first.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn my_orders(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(json!({ "success": true, "orders": orders })))
}

/// `GET /orders/{id}` - one order (owner or admin).
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let order = load_owned(&state, &user, OrderId::new(id)).await?;

    Ok(Json(json!({ "success": true, "order": order })))
}

/// `PUT /orders/{id}/status` - admin status update, validated against the
/// state machine.
#[instrument(skip(state, body))]
pub async fn update_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<StatusBody>,
) -> Result<impl IntoResponse> {
    let next: OrderStatus = body
        .status
        .parse()
        .map_err(|_| AppError::Validation(format!("Unknown order status: {}", body.status)))?;

    let order = OrderRepository::new(state.pool())
        .transition(OrderId::new(id), next, body.note, body.tracking_number)
        .await?;

    Ok(Json(json!({ "success": true, "order": order })))
}

/// `PUT /orders/{id}/cancel` - cancel an order (owner or admin).
///
/// The body is optional; a submitted note is recorded in the history entry,
/// otherwise a default note is used.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn cancel(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Option<Json<CancelBody>>,
) -> Result<impl IntoResponse> {
    let order = load_owned(&state, &user, OrderId::new(id)).await?;

    let note = body
        .and_then(|Json(body)| body.note)
        .unwrap_or_else(|| "Order cancelled by user".to_owned());

    let order = OrderRepository::new(state.pool())
        .transition(order.id, OrderStatus::Cancelled, Some(note), None)
        .await?;

    Ok(Json(json!({ "success": true, "order": order })))
}

/// `GET /orders` - paginated admin listing with optional status filter.
#[instrument(skip(state))]
pub async fn admin_index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> Result<impl IntoResponse> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(|_| {
            AppError::Validation(format!(
                "Unknown order status: {}",
                query.status.as_deref().unwrap_or_default()
            ))
        })?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100);

    let (orders, total) = OrderRepository::new(state.pool())
        .list_all(status, page, limit)
        .await?;
    let total_pages = total.cast_unsigned().div_ceil(limit.cast_unsigned());

    Ok(Json(json!({
        "success": true,
        "count": orders.len(),
        "total": total,
        "totalPages": total_pages,
        "currentPage": page,
        "orders": orders,
    })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_note_is_optional_and_passed_through() {
        let body: CancelBody = serde_json::from_str("{}").unwrap();
        assert!(body.note.is_none());

        let body: CancelBody = serde_json::from_str(r#"{"note":"Changed my mind"}"#).unwrap();
        assert_eq!(body.note.as_deref(), Some("Changed my mind"));
    }
}
