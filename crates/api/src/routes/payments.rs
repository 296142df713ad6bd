//! Payment route handlers.
//!
//! `create-order` asks the provider for a payment order matching our order's
//! total; `verify` checks the signed callback. A failed verification leaves
//! the order untouched; a successful one moves it to `processing` and clears
//! the cart (idempotent if it was already cleared at placement).

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use marigold_core::OrderId;

use crate::db::carts::CartRepository;
use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::PaymentResult;
use crate::routes::orders::load_owned;
use crate::state::AppState;

/// Store currency for provider-side orders.
const CURRENCY: &str = "USD";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
    order_id: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyBody {
    order_id: i32,
    remote_order_id: String,
    remote_payment_id: String,
    signature: String,
}

/// `POST /payments/create-order` - create a provider-side payment order.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_order(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse> {
    let order = load_owned(&state, &user, OrderId::new(body.order_id)).await?;

    let receipt = format!("order_{}", order.id);
    let remote = state
        .payments()
        .create_order(order.total, CURRENCY, &receipt)
        .await?;

    Ok(Json(json!({
        "success": true,
        "order": {
            "id": remote.id,
            "amount": remote.amount,
            "currency": remote.currency,
            "receipt": remote.receipt,
        },
        "keyId": state.payments().key_id(),
    })))
}

/// `POST /payments/verify` - verify the signed completed-payment callback.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn verify(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<VerifyBody>,
) -> Result<impl IntoResponse> {
    let order = load_owned(&state, &user, OrderId::new(body.order_id)).await?;

    if !state.payments().signature_matches(
        &body.remote_order_id,
        &body.remote_payment_id,
        &body.signature,
    ) {
        return Err(AppError::InvalidSignature);
    }

    let payment = PaymentResult {
        id: body.remote_payment_id,
        status: "captured".to_owned(),
        update_time: Utc::now(),
        email_address: Some(user.email.as_str().to_owned()),
    };

    let order = OrderRepository::new(state.pool())
        .confirm_payment(order.id, payment)
        .await?;

    // The cart is usually already empty from placement; clearing again is
    // harmless.
    CartRepository::new(state.pool()).clear(user.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Payment verified",
        "order": order,
    })))
}
