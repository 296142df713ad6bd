//! Business-logic services.
//!
//! Services sit between route handlers and repositories: handlers parse and
//! authorize, services validate and orchestrate, repositories persist.

pub mod auth;
pub mod checkout;

pub use auth::AuthService;
pub use checkout::{CheckoutService, PlaceOrder};
