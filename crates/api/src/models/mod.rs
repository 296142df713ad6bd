//! Domain models for the storefront API.
//!
//! Wire representations use camelCase field names to match the public JSON
//! contract; database row structs live next to their repositories in
//! [`crate::db`].

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem, ProductSummary};
pub use order::{Order, OrderAddress, OrderItem, PaymentResult, StatusEntry};
pub use product::{Color, Product};
pub use session::{CurrentUser, session_keys};
pub use user::{AddressKind, StoredAddress, User};
