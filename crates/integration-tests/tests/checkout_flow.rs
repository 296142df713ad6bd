//! Checkout step machine and totals arithmetic.

use marigold_core::{
    CheckoutStep, OrderTotals, ShippingMethod, ShippingReadiness, StepError, line_subtotal,
};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

#[test]
fn reference_cart_totals() {
    // Product at $20.00, quantity 2, standard shipping.
    let subtotal = line_subtotal(dec("20.00"), 2);
    assert_eq!(subtotal, dec("40.00"));

    let totals = OrderTotals::compute(subtotal, ShippingMethod::Standard);
    assert_eq!(totals.tax, dec("3.20"));
    assert_eq!(totals.shipping, dec("5.99"));
    assert_eq!(totals.total, dec("49.19"));
}

#[test]
fn express_shipping_changes_only_the_flat_fee() {
    let standard = OrderTotals::compute(dec("40.00"), ShippingMethod::Standard);
    let express = OrderTotals::compute(dec("40.00"), ShippingMethod::Express);

    assert_eq!(standard.subtotal, express.subtotal);
    assert_eq!(standard.tax, express.tax);
    assert_eq!(express.shipping, dec("12.99"));
    assert_eq!(express.total - standard.total, dec("7.00"));
}

#[test]
fn shipping_gate_blocks_until_all_fields_present() {
    let incomplete = ShippingReadiness::from_fields("123 Main St", "Springfield", "", "");
    let err = CheckoutStep::Shipping.advance(&incomplete).expect_err("gated");
    match err {
        StepError::IncompleteShipping { missing } => {
            assert_eq!(missing, vec!["state", "zipCode"]);
        }
        StepError::AlreadyAtEnd => panic!("wrong error"),
    }

    let complete = ShippingReadiness::from_fields("123 Main St", "Springfield", "IL", "62704");
    let step = CheckoutStep::Shipping.advance(&complete).expect("advance");
    assert_eq!(step, CheckoutStep::Payment);
}

#[test]
fn back_navigation_never_fails() {
    let mut step = CheckoutStep::Confirmation;
    let mut hops = 0;
    while let Some(previous) = step.back() {
        step = previous;
        hops += 1;
    }
    assert_eq!(step, CheckoutStep::Shipping);
    assert_eq!(hops, 2);
}
