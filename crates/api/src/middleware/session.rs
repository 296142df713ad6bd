//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. The session
//! cookie is signed with a key derived from the configured session secret.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::ApiConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "token";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// The cookie is HTTP-only, `SameSite=Strict`, signed, and marked `Secure`
/// when the public base URL is served over HTTPS.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &ApiConfig,
) -> SessionManagerLayer<PostgresStore, SignedCookie> {
    // Note: The sessions table must be created via migration
    let store = PostgresStore::new(pool.clone());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.serves_https())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(&config.session_secret))
}

/// Derive the cookie-signing key from the session secret.
///
/// Config validation guarantees at least 32 bytes of key material, which is
/// the minimum `Key::derive_from` accepts.
fn signing_key(secret: &SecretString) -> Key {
    Key::derive_from(secret.expose_secret().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_key_derives_from_minimum_length_secret() {
        let secret = SecretString::from("a".repeat(32));
        let _ = signing_key(&secret);
    }

    #[test]
    fn test_signing_key_is_deterministic_per_secret() {
        let first = signing_key(&SecretString::from("x".repeat(32)));
        let again = signing_key(&SecretString::from("x".repeat(32)));
        let other = signing_key(&SecretString::from("y".repeat(32)));

        assert_eq!(first.master(), again.master());
        assert_ne!(first.master(), other.master());
    }
}
