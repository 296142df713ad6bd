//! Order aggregate models.
//!
//! Orders snapshot everything they need at placement time: later catalog
//! edits never alter historical orders. The status history is an append-only
//! audit log whose last entry always matches the order's current status.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use marigold_core::{OrderId, OrderStatus, UserId};

/// A postal address captured on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Product attributes captured at order-creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub size: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One entry in an order's status history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub status: OrderStatus,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Opaque payment identifiers recorded after successful verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    /// The provider's payment id.
    pub id: String,
    pub status: String,
    pub update_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user: UserId,
    pub items: Vec<OrderItem>,
    pub shipping_address: OrderAddress,
    pub billing_address: OrderAddress,
    pub payment_method: String,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub status_history: Vec<StatusEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_result: Option<PaymentResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// The final entry of the status history.
    ///
    /// Creation seeds one entry, so a well-formed order always has one.
    #[must_use]
    pub fn last_status_entry(&self) -> Option<&StatusEntry> {
        self.status_history.last()
    }

    /// True when the history invariant holds: non-empty, and the last
    /// entry's status equals the order's current status.
    #[must_use]
    pub fn history_is_consistent(&self) -> bool {
        self.last_status_entry()
            .is_some_and(|entry| entry.status == self.status)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_order(status: OrderStatus, history: Vec<StatusEntry>) -> Order {
        let address = OrderAddress {
            street: "123 Main St".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            zip_code: "62704".to_owned(),
            country: "USA".to_owned(),
        };
        Order {
            id: OrderId::new(1),
            user: UserId::new(1),
            items: vec![OrderItem {
                name: "Ribbed Tank".to_owned(),
                price: "20.00".parse().unwrap(),
                quantity: 2,
                size: "M".to_owned(),
                color: "Black".to_owned(),
                image: None,
            }],
            shipping_address: address.clone(),
            billing_address: address,
            payment_method: "card".to_owned(),
            subtotal: "40.00".parse().unwrap(),
            tax: "3.20".parse().unwrap(),
            shipping: "5.99".parse().unwrap(),
            total: "49.19".parse().unwrap(),
            status,
            status_history: history,
            tracking_number: None,
            payment_result: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_history_consistency() {
        let entry = StatusEntry {
            status: OrderStatus::Pending,
            date: Utc::now(),
            note: Some("Order placed".to_owned()),
        };
        let order = sample_order(OrderStatus::Pending, vec![entry.clone()]);
        assert!(order.history_is_consistent());

        // Status moved without an appended entry: inconsistent.
        let order = sample_order(OrderStatus::Processing, vec![entry]);
        assert!(!order.history_is_consistent());

        // Empty history is never consistent.
        let order = sample_order(OrderStatus::Pending, vec![]);
        assert!(!order.history_is_consistent());
    }

    #[test]
    fn test_wire_shape() {
        let order = sample_order(
            OrderStatus::Pending,
            vec![StatusEntry {
                status: OrderStatus::Pending,
                date: Utc::now(),
                note: Some("Order placed".to_owned()),
            }],
        );
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["status"], "pending");
        assert!(value.get("statusHistory").is_some());
        assert!(value.get("shippingAddress").is_some());
        // Absent optionals are omitted, not null.
        assert!(value.get("trackingNumber").is_none());
    }
}
