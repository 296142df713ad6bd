//! Order status machine and history invariants, exercised across crates the
//! way the API uses them.

use chrono::Utc;
use marigold_core::{OrderId, OrderStatus, OrderStatusError, UserId};
use marigold_api::models::{Order, OrderAddress, OrderItem, StatusEntry};

fn address() -> OrderAddress {
    OrderAddress {
        street: "123 Main St".to_owned(),
        city: "Springfield".to_owned(),
        state: "IL".to_owned(),
        zip_code: "62704".to_owned(),
        country: "USA".to_owned(),
    }
}

fn order_with(status: OrderStatus, history: Vec<StatusEntry>) -> Order {
    Order {
        id: OrderId::new(1),
        user: UserId::new(7),
        items: vec![OrderItem {
            name: "Ribbed Tank Top".to_owned(),
            price: "20.00".parse().expect("price"),
            quantity: 2,
            size: "M".to_owned(),
            color: "Black".to_owned(),
            image: None,
        }],
        shipping_address: address(),
        billing_address: address(),
        payment_method: "card".to_owned(),
        subtotal: "40.00".parse().expect("subtotal"),
        tax: "3.20".parse().expect("tax"),
        shipping: "5.99".parse().expect("shipping"),
        total: "49.19".parse().expect("total"),
        status,
        status_history: history,
        tracking_number: None,
        payment_result: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn entry(status: OrderStatus, note: &str) -> StatusEntry {
    StatusEntry {
        status,
        date: Utc::now(),
        note: Some(note.to_owned()),
    }
}

#[test]
fn full_fulfilment_walk_keeps_history_consistent() {
    let mut status = OrderStatus::Pending;
    let mut history = vec![entry(status, "Order placed")];

    for next in [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ] {
        status = status.transition_to(next).expect("forward transition");
        history.push(entry(status, "Status updated"));

        let order = order_with(status, history.clone());
        assert!(order.history_is_consistent());
    }

    assert!(status.is_terminal());
    assert_eq!(history.len(), 4);
}

#[test]
fn skipping_states_is_rejected() {
    assert!(matches!(
        OrderStatus::Pending.transition_to(OrderStatus::Shipped),
        Err(OrderStatusError::InvalidTransition { .. })
    ));
    assert!(matches!(
        OrderStatus::Processing.transition_to(OrderStatus::Delivered),
        Err(OrderStatusError::InvalidTransition { .. })
    ));
}

#[test]
fn cancellation_window_closes_at_shipment() {
    assert!(OrderStatus::Pending.transition_to(OrderStatus::Cancelled).is_ok());
    assert!(
        OrderStatus::Processing
            .transition_to(OrderStatus::Cancelled)
            .is_ok()
    );
    assert!(
        OrderStatus::Shipped
            .transition_to(OrderStatus::Cancelled)
            .is_err()
    );
    assert!(
        OrderStatus::Delivered
            .transition_to(OrderStatus::Cancelled)
            .is_err()
    );
}

#[test]
fn terminal_states_accept_nothing() {
    for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
        for next in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert!(terminal.transition_to(next).is_err());
        }
    }
}

#[test]
fn order_wire_format_uses_camel_case_and_omits_absent_optionals() {
    let order = order_with(
        OrderStatus::Pending,
        vec![entry(OrderStatus::Pending, "Order placed")],
    );
    let value = serde_json::to_value(&order).expect("serialize");

    assert_eq!(value["status"], "pending");
    assert_eq!(value["statusHistory"][0]["status"], "pending");
    assert_eq!(value["shippingAddress"]["zipCode"], "62704");
    assert!(value.get("trackingNumber").is_none());
    assert!(value.get("paymentResult").is_none());
}
