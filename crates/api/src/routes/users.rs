//! Account route handlers: profile and saved addresses.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use marigold_core::{AddressId, Email};

use crate::db::RepositoryError;
use crate::db::addresses::{AddressInput, AddressRepository};
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, set_current_user};
use crate::models::{AddressKind, CurrentUser};
use crate::services::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBody {
    first_name: String,
    last_name: String,
    email: String,
    /// When present, the password is changed too.
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBody {
    #[serde(rename = "type")]
    kind: String,
    street: String,
    city: String,
    state: String,
    zip_code: String,
    country: String,
    #[serde(default)]
    is_default: bool,
}

/// `PUT /users/profile` - update name, email, and optionally password.
#[instrument(skip(state, session, user, body), fields(user_id = %user.id))]
pub async fn update_profile(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<ProfileBody>,
) -> Result<impl IntoResponse> {
    let email = Email::parse(&body.email)
        .map_err(|e| AppError::Validation(format!("Invalid email address: {e}")))?;

    let updated = UserRepository::new(state.pool())
        .update_profile(user.id, &body.first_name, &body.last_name, &email)
        .await?;

    if let Some(password) = &body.password {
        AuthService::new(state.pool())
            .change_password(user.id, password)
            .await?;
    }

    // Keep the session's identity in sync with the new email.
    set_current_user(
        &session,
        &CurrentUser {
            id: updated.id,
            email: updated.email.clone(),
            role: updated.role,
        },
    )
    .await?;

    Ok(Json(json!({ "success": true, "user": updated })))
}

/// `GET /users/addresses` - the user's saved addresses.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_addresses(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let addresses = AddressRepository::new(state.pool()).list(user.id).await?;

    Ok(Json(json!({ "success": true, "addresses": addresses })))
}

/// `POST /users/address` - insert or replace the address of a given type.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn upsert_address(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(body): Json<AddressBody>,
) -> Result<impl IntoResponse> {
    let kind: AddressKind = body
        .kind
        .parse()
        .map_err(|_| AppError::Validation(format!("Unknown address type: {}", body.kind)))?;

    let address = AddressRepository::new(state.pool())
        .upsert(
            user.id,
            AddressInput {
                kind,
                street: body.street,
                city: body.city,
                state: body.state,
                zip_code: body.zip_code,
                country: body.country,
                is_default: body.is_default,
            },
        )
        .await?;

    Ok(Json(json!({ "success": true, "address": address })))
}

/// `DELETE /users/address/{id}` - remove a saved address.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_address(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    AddressRepository::new(state.pool())
        .delete(user.id, AddressId::new(id))
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Address".to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(Json(json!({ "success": true, "message": "Address deleted" })))
}
