//! Checkout step state machine.
//!
//! The checkout is a linear three-step flow with back-navigation:
//! `shipping -> payment -> confirmation`. Nothing is persisted until the
//! order is placed at the confirmation step, so the machine is pure: callers
//! hold the current step and ask it to move.

use serde::{Deserialize, Serialize};

/// One step of the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    #[default]
    Shipping,
    Payment,
    Confirmation,
}

/// Presence snapshot of the required shipping-address fields.
///
/// Only presence is checked here; the values themselves are free-form.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShippingReadiness {
    pub street: bool,
    pub city: bool,
    pub state: bool,
    pub zip_code: bool,
}

impl ShippingReadiness {
    /// Build a readiness snapshot from the raw field values.
    ///
    /// Whitespace-only input counts as absent.
    #[must_use]
    pub fn from_fields(street: &str, city: &str, state: &str, zip_code: &str) -> Self {
        Self {
            street: !street.trim().is_empty(),
            city: !city.trim().is_empty(),
            state: !state.trim().is_empty(),
            zip_code: !zip_code.trim().is_empty(),
        }
    }

    /// Names of the required fields that are still missing.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.street {
            missing.push("street");
        }
        if !self.city {
            missing.push("city");
        }
        if !self.state {
            missing.push("state");
        }
        if !self.zip_code {
            missing.push("zipCode");
        }
        missing
    }

    /// True when every required field is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

/// Error advancing the checkout flow.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StepError {
    /// The shipping step cannot be left until the required fields are filled.
    #[error("missing required shipping fields: {}", missing.join(", "))]
    IncompleteShipping {
        /// Names of the absent fields.
        missing: Vec<&'static str>,
    },
    /// The flow is already at the confirmation step.
    #[error("checkout is already at the confirmation step")]
    AlreadyAtEnd,
}

impl CheckoutStep {
    /// Attempt to advance to the next step.
    ///
    /// The `shipping -> payment` edge is gated on the required shipping
    /// fields; `payment -> confirmation` always proceeds.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::IncompleteShipping`] if the shipping address is
    /// incomplete, or [`StepError::AlreadyAtEnd`] at the confirmation step.
    pub fn advance(self, shipping: &ShippingReadiness) -> Result<Self, StepError> {
        match self {
            Self::Shipping => {
                if shipping.is_complete() {
                    Ok(Self::Payment)
                } else {
                    Err(StepError::IncompleteShipping {
                        missing: shipping.missing(),
                    })
                }
            }
            Self::Payment => Ok(Self::Confirmation),
            Self::Confirmation => Err(StepError::AlreadyAtEnd),
        }
    }

    /// The previous step, if any (back-navigation is always allowed).
    #[must_use]
    pub const fn back(self) -> Option<Self> {
        match self {
            Self::Shipping => None,
            Self::Payment => Some(Self::Shipping),
            Self::Confirmation => Some(Self::Payment),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const COMPLETE: ShippingReadiness = ShippingReadiness {
        street: true,
        city: true,
        state: true,
        zip_code: true,
    };

    #[test]
    fn test_happy_path() {
        let step = CheckoutStep::Shipping.advance(&COMPLETE).unwrap();
        assert_eq!(step, CheckoutStep::Payment);
        let step = step.advance(&COMPLETE).unwrap();
        assert_eq!(step, CheckoutStep::Confirmation);
        assert!(matches!(
            step.advance(&COMPLETE),
            Err(StepError::AlreadyAtEnd)
        ));
    }

    #[test]
    fn test_shipping_gate() {
        let readiness = ShippingReadiness::from_fields("123 Main St", "", "CA", "  ");
        let err = CheckoutStep::Shipping.advance(&readiness).unwrap_err();
        match err {
            StepError::IncompleteShipping { missing } => {
                assert_eq!(missing, vec!["city", "zipCode"]);
            }
            StepError::AlreadyAtEnd => panic!("wrong error"),
        }
    }

    #[test]
    fn test_payment_step_has_no_gate() {
        // The payment -> confirmation edge never validates anything.
        let none = ShippingReadiness::default();
        assert_eq!(
            CheckoutStep::Payment.advance(&none).unwrap(),
            CheckoutStep::Confirmation
        );
    }

    #[test]
    fn test_back_navigation() {
        assert_eq!(CheckoutStep::Shipping.back(), None);
        assert_eq!(CheckoutStep::Payment.back(), Some(CheckoutStep::Shipping));
        assert_eq!(
            CheckoutStep::Confirmation.back(),
            Some(CheckoutStep::Payment)
        );
    }

    #[test]
    fn test_from_fields_trims() {
        let r = ShippingReadiness::from_fields(" ", "Springfield", "IL", "62704");
        assert!(!r.street);
        assert!(r.city && r.state && r.zip_code);
        assert!(!r.is_complete());
    }
}
