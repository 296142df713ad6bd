//! Integration tests for Marigold.
//!
//! # Running Tests
//!
//! Domain-level tests run with a plain `cargo test -p
//! marigold-integration-tests`. HTTP tests are `#[ignore]`d and need a
//! running API server plus a migrated database:
//!
//! ```bash
//! cargo run -p marigold-cli -- migrate
//! cargo run -p marigold-api &
//! cargo test -p marigold-integration-tests -- --ignored
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("MARIGOLD_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// HTTP client with a cookie store, so the session survives across requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
