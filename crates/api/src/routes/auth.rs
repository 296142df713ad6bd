//! Authentication route handlers.
//!
//! Sessions are cookie-backed; login and registration both establish a
//! session, logout destroys it.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::db::users::UserRepository;
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    email: String,
    password: String,
}

fn current_user_of(user: &User) -> CurrentUser {
    CurrentUser {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
    }
}

/// `POST /auth/register` - create an account and log it in.
#[instrument(skip(state, session, body))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse> {
    let user = AuthService::new(state.pool())
        .register(&body.first_name, &body.last_name, &body.email, &body.password)
        .await?;

    set_current_user(&session, &current_user_of(&user)).await?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "user": user })),
    ))
}

/// `POST /auth/login` - log in with email and password.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;

    // Rotate the session id on privilege change.
    session.cycle_id().await?;
    set_current_user(&session, &current_user_of(&user)).await?;

    Ok(Json(json!({ "success": true, "user": user })))
}

/// `POST /auth/logout` - destroy the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    clear_current_user(&session).await?;
    session.flush().await?;

    Ok(Json(json!({ "success": true, "message": "Logged out" })))
}

/// `GET /auth/me` - the logged-in user's account.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn me(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let user = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_owned()))?;

    Ok(Json(json!({ "success": true, "user": user })))
}
