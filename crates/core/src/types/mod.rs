//! Core types for Marigold.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod checkout;
pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use checkout::{CheckoutStep, ShippingReadiness, StepError};
pub use email::{Email, EmailError};
pub use id::*;
pub use money::{OrderTotals, ShippingMethod, line_subtotal};
pub use status::{OrderStatus, OrderStatusError, UserRole};
