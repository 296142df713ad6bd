//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                      - Liveness check
//! GET    /health/ready                - Readiness check (DB ping)
//!
//! # Auth
//! POST   /auth/register               - Create an account and log in
//! POST   /auth/login                  - Login
//! POST   /auth/logout                 - Logout
//! GET    /auth/me                     - Current account
//!
//! # Products
//! GET    /products                    - Filtered/sorted/paginated listing
//! GET    /products/{id}               - Detail by ID
//! GET    /products/slug/{slug}        - Detail by slug (cached)
//! GET    /products/featured/list      - Featured shelf
//! GET    /products/new/arrivals       - New-arrival shelf
//! GET    /products/{id}/related       - Same-category products
//! GET    /products/category/{category} - Category listing
//! POST   /products                    - Create (admin)
//! PUT    /products/{id}               - Replace (admin)
//! DELETE /products/{id}               - Delete (admin)
//!
//! # Cart (requires auth)
//! GET    /cart                        - Current cart
//! POST   /cart/add                    - Add line item (merges duplicates)
//! PUT    /cart/update/{item_id}       - Set quantity
//! DELETE /cart/remove/{item_id}       - Remove line item
//! DELETE /cart/clear                  - Empty the cart
//!
//! # Orders (requires auth)
//! POST   /orders                      - Place an order
//! GET    /orders                      - Paginated listing (admin)
//! GET    /orders/my-orders            - Current user's orders
//! GET    /orders/{id}                 - One order (owner or admin)
//! PUT    /orders/{id}/status          - Status update (admin)
//! PUT    /orders/{id}/cancel          - Cancel (owner or admin)
//!
//! # Payments (requires auth)
//! POST   /payments/create-order       - Create provider-side payment order
//! POST   /payments/verify             - Verify signed payment callback
//!
//! # Account (requires auth)
//! PUT    /users/profile               - Update profile
//! GET    /users/addresses             - Saved addresses
//! POST   /users/address               - Upsert address by type
//! DELETE /users/address/{id}          - Delete address
//! ```

pub mod auth;
pub mod cart;
pub mod orders;
pub mod payments;
pub mod products;
pub mod users;

use axum::{
    Json,
    Router,
    extract::State,
    routing::{delete, get, post, put},
};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// `GET /health` - liveness.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /health/ready` - readiness, including a database ping.
async fn ready(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(state.pool())
        .await
        .map_err(|e| AppError::Internal(format!("database not ready: {e}")))?;

    Ok(Json(json!({ "status": "ok", "database": "ok" })))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/slug/{slug}", get(products::show_by_slug))
        .route("/featured/list", get(products::featured))
        .route("/new/arrivals", get(products::new_arrivals))
        .route("/{id}/related", get(products::related))
        .route("/category/{category}", get(products::by_category))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update/{item_id}", put(cart::update))
        .route("/remove/{item_id}", delete(cart::remove))
        .route("/clear", delete(cart::clear))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::admin_index))
        .route("/my-orders", get(orders::my_orders))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", put(orders::update_status))
        .route("/{id}/cancel", put(orders::cancel))
}

/// Create the payment routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/create-order", post(payments::create_order))
        .route("/verify", post(payments::verify))
}

/// Create the account routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", put(users::update_profile))
        .route("/addresses", get(users::list_addresses))
        .route("/address", post(users::upsert_address))
        .route("/address/{id}", delete(users::delete_address))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/payments", payment_routes())
        .nest("/users", user_routes())
}
