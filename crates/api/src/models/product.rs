//! Catalog product model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use marigold_core::ProductId;

/// A named color option with its display swatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub name: String,
    pub hex: String,
}

/// A catalog product.
///
/// Mutable only through admin actions; carts reference products live while
/// orders snapshot the fields they need at placement time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    /// URL handle, unique and lowercase.
    pub slug: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    /// Ordered gallery images; the first is the primary image.
    pub images: Vec<String>,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Average review rating in [0, 5].
    pub rating: f64,
    pub review_count: i32,
    pub is_new: bool,
    pub is_featured: bool,
    pub available_sizes: Vec<String>,
    pub colors: Vec<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The primary gallery image, if the product has any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let product = Product {
            id: ProductId::new(1),
            slug: "ribbed-tank".to_owned(),
            name: "Ribbed Tank".to_owned(),
            description: "A tank top".to_owned(),
            full_description: None,
            price: "20.00".parse().unwrap(),
            original_price: None,
            images: vec!["/images/ribbed-tank-1.jpg".to_owned()],
            category: "tops".to_owned(),
            subcategory: None,
            rating: 4.5,
            review_count: 12,
            is_new: true,
            is_featured: false,
            available_sizes: vec!["S".to_owned(), "M".to_owned()],
            colors: vec![Color {
                name: "Black".to_owned(),
                hex: "#000000".to_owned(),
            }],
            material: None,
            stock: 25,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&product).unwrap();
        assert!(value.get("reviewCount").is_some());
        assert!(value.get("isNew").is_some());
        assert!(value.get("availableSizes").is_some());
        assert!(value.get("review_count").is_none());
    }

    #[test]
    fn test_primary_image() {
        let mut product: Product = serde_json::from_value(serde_json::json!({
            "id": 1, "slug": "s", "name": "n", "description": "d",
            "price": "1.00", "images": ["a.jpg", "b.jpg"], "category": "c",
            "rating": 0.0, "reviewCount": 0, "isNew": false, "isFeatured": false,
            "availableSizes": [], "colors": [], "stock": 0,
            "createdAt": "2026-01-01T00:00:00Z", "updatedAt": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(product.primary_image(), Some("a.jpg"));
        product.images.clear();
        assert_eq!(product.primary_image(), None);
    }
}
