//! Money arithmetic for carts and checkout.
//!
//! All amounts are [`Decimal`] values in the store currency's major unit
//! (dollars, not cents). Conversion to minor units happens only at the
//! payment-provider boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sales tax rate applied to the cart subtotal (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Shipping method selected at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    /// Flat $5.99, 5-7 business days.
    #[default]
    Standard,
    /// Flat $12.99, 1-2 business days.
    Express,
}

impl ShippingMethod {
    /// Flat shipping fee for this method.
    #[must_use]
    pub const fn fee(self) -> Decimal {
        match self {
            // 5.99 / 12.99
            Self::Standard => Decimal::from_parts(599, 0, 0, false, 2),
            Self::Express => Decimal::from_parts(1299, 0, 0, false, 2),
        }
    }
}

/// Computed totals for an order, all rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute totals from a cart subtotal and shipping method.
    ///
    /// Tax is [`TAX_RATE`] of the subtotal; each component and the grand
    /// total are rounded to cents independently.
    #[must_use]
    pub fn compute(subtotal: Decimal, shipping: ShippingMethod) -> Self {
        let subtotal = subtotal.round_dp(2);
        let tax = (subtotal * TAX_RATE).round_dp(2);
        let shipping = shipping.fee();
        let total = (subtotal + tax + shipping).round_dp(2);

        Self {
            subtotal,
            tax,
            shipping,
            total,
        }
    }
}

/// Subtotal for one line item: unit price times quantity.
#[must_use]
pub fn line_subtotal(unit_price: Decimal, quantity: u32) -> Decimal {
    (unit_price * Decimal::from(quantity)).round_dp(2)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_tax_rate_constant() {
        assert_eq!(TAX_RATE, dec("0.08"));
    }

    #[test]
    fn test_shipping_fees() {
        assert_eq!(ShippingMethod::Standard.fee(), dec("5.99"));
        assert_eq!(ShippingMethod::Express.fee(), dec("12.99"));
    }

    #[test]
    fn test_line_subtotal() {
        assert_eq!(line_subtotal(dec("20.00"), 2), dec("40.00"));
        assert_eq!(line_subtotal(dec("19.99"), 3), dec("59.97"));
    }

    // $20.00 x 2 => subtotal 40.00, tax 3.20, shipping 5.99, total 49.19
    #[test]
    fn test_reference_order() {
        let totals = OrderTotals::compute(dec("40.00"), ShippingMethod::Standard);
        assert_eq!(totals.subtotal, dec("40.00"));
        assert_eq!(totals.tax, dec("3.20"));
        assert_eq!(totals.shipping, dec("5.99"));
        assert_eq!(totals.total, dec("49.19"));
    }

    #[test]
    fn test_rounds_to_cents() {
        // 8% of 19.99 is 1.5992, which rounds to 1.60
        let totals = OrderTotals::compute(dec("19.99"), ShippingMethod::Express);
        assert_eq!(totals.tax, dec("1.60"));
        assert_eq!(totals.total, dec("34.58"));
    }

    #[test]
    fn test_zero_subtotal() {
        let totals = OrderTotals::compute(Decimal::ZERO, ShippingMethod::Standard);
        assert_eq!(totals.tax, dec("0.00"));
        assert_eq!(totals.total, dec("5.99"));
    }
}
