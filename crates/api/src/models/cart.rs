//! Cart aggregate models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use marigold_core::{CartItemId, ProductId, line_subtotal};

/// The slice of a product that cart responses embed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub price: Decimal,
    pub images: Vec<String>,
    pub available_sizes: Vec<String>,
}

/// One line item in a user's cart.
///
/// Line items are keyed by (product, size, color); adding the same key again
/// merges quantities instead of creating a second line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub product: ProductSummary,
    pub quantity: i32,
    pub size: String,
    pub color: String,
}

impl CartItem {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        line_subtotal(self.product.price, self.quantity.unsigned_abs())
    }
}

/// A user's cart with its derived subtotal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
}

impl Cart {
    /// Build a cart from its line items, computing the subtotal.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let subtotal = items.iter().map(CartItem::line_total).sum();
        Self { items, subtotal }
    }

    /// An empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Decimal::ZERO,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i32, price: &str, quantity: i32) -> CartItem {
        CartItem {
            id: CartItemId::new(id),
            product: ProductSummary {
                id: ProductId::new(id),
                slug: format!("product-{id}"),
                name: format!("Product {id}"),
                price: price.parse().unwrap(),
                images: vec![],
                available_sizes: vec![],
            },
            quantity,
            size: "M".to_owned(),
            color: "Black".to_owned(),
        }
    }

    #[test]
    fn test_subtotal_sums_lines() {
        let cart = Cart::from_items(vec![item(1, "20.00", 2), item(2, "5.50", 1)]);
        assert_eq!(cart.subtotal, "45.50".parse().unwrap());
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::empty();
        assert!(cart.items.is_empty());
        assert_eq!(cart.subtotal, Decimal::ZERO);
    }
}
