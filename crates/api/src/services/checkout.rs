//! Checkout service.
//!
//! Walks the checkout flow for an order-placement request: the shipping gate
//! runs against the submitted address, then the order is persisted (clearing
//! the cart when asked) in one repository transaction.
//!
//! Submitted totals are stored as-is; they are only cross-checked against
//! the domain arithmetic for logging. See the trust-boundary note on
//! [`PlaceOrder`].

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use marigold_core::{
    CheckoutStep, OrderTotals, ShippingMethod, ShippingReadiness, StepError, UserId,
};

use crate::db::RepositoryError;
use crate::db::orders::{NewOrder, OrderRepository};
use crate::error::AppError;
use crate::models::{Order, OrderAddress, OrderItem};

/// Errors placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No line items were submitted.
    #[error("order must contain at least one item")]
    EmptyCart,

    /// A line item has a non-positive quantity.
    #[error("item quantity must be at least 1")]
    InvalidQuantity,

    /// The checkout flow rejected the request.
    #[error(transparent)]
    Step(#[from] StepError),

    /// Repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<CheckoutError> for AppError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::EmptyCart | CheckoutError::InvalidQuantity | CheckoutError::Step(_) => {
                Self::Validation(e.to_string())
            }
            CheckoutError::Repository(e) => Self::Database(e),
        }
    }
}

/// An order-placement request, after deserialization.
///
/// The totals are client-computed and stored without server-side
/// recomputation against catalog prices. A mismatch against the domain
/// arithmetic is logged but not rejected.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub items: Vec<OrderItem>,
    pub shipping_address: OrderAddress,
    /// Defaults to the shipping address when absent.
    pub billing_address: Option<OrderAddress>,
    pub payment_method: String,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    /// Empty the user's cart in the same transaction.
    pub clear_cart: bool,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Place an order, optionally clearing the user's cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Step`] if the shipping address is missing
    /// required fields, [`CheckoutError::EmptyCart`] for an itemless request.
    pub async fn place_order(
        &self,
        user_id: UserId,
        request: PlaceOrder,
    ) -> Result<Order, CheckoutError> {
        if request.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if request.items.iter().any(|item| item.quantity < 1) {
            return Err(CheckoutError::InvalidQuantity);
        }

        // Run the flow end to end; only the shipping gate can fail here.
        let readiness = readiness_of(&request.shipping_address);
        let step = CheckoutStep::Shipping.advance(&readiness)?;
        let step = step.advance(&readiness)?;
        debug_assert_eq!(step, CheckoutStep::Confirmation);

        cross_check_totals(&request);

        let billing_address = request
            .billing_address
            .unwrap_or_else(|| request.shipping_address.clone());

        let order = self
            .orders
            .create(
                user_id,
                NewOrder {
                    items: request.items,
                    shipping_address: request.shipping_address,
                    billing_address,
                    payment_method: request.payment_method,
                    subtotal: request.subtotal,
                    tax: request.tax,
                    shipping: request.shipping,
                    total: request.total,
                    clear_cart: request.clear_cart,
                },
            )
            .await?;

        Ok(order)
    }
}

fn readiness_of(address: &OrderAddress) -> ShippingReadiness {
    ShippingReadiness::from_fields(
        &address.street,
        &address.city,
        &address.state,
        &address.zip_code,
    )
}

/// Compare the submitted totals against the domain arithmetic and log any
/// drift. The submitted values still win.
fn cross_check_totals(request: &PlaceOrder) {
    let method = if request.shipping == ShippingMethod::Express.fee() {
        ShippingMethod::Express
    } else {
        ShippingMethod::Standard
    };
    let expected = OrderTotals::compute(request.subtotal, method);

    if expected.total != request.total || expected.tax != request.tax {
        tracing::warn!(
            submitted_total = %request.total,
            expected_total = %expected.total,
            submitted_tax = %request.tax,
            expected_tax = %expected.tax,
            "submitted order totals differ from computed totals"
        );
    }
}
