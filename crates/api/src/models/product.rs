//! Catalog models: categories, products, and their variants.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use velour_core::{CategoryId, ProductId};

/// A product category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A size variant of a product, with its own price and stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SizeVariant {
    pub label: String,
    pub price: Decimal,
    pub stock: i32,
}

/// A color variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ColorVariant {
    pub label: String,
}

/// A product with its variants assembled.
///
/// Deletes are soft: `active` flips to false and the row stays so historic
/// orders and cart lines keep a referent. Cart retrieval treats inactive
/// products as missing.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub images: Vec<String>,
    pub sizes: Vec<SizeVariant>,
    pub colors: Vec<ColorVariant>,
    pub trade_price: Option<Decimal>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// First image URL, used as the line-item thumbnail on orders.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Price of the size variant whose label matches, if any.
    #[must_use]
    pub fn price_for_size(&self, label: &str) -> Option<Decimal> {
        self.sizes
            .iter()
            .find(|variant| variant.label == label)
            .map(|variant| variant.price)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn product_with_sizes(sizes: Vec<SizeVariant>) -> Product {
        Product {
            id: ProductId::new(Uuid::nil()),
            name: "Silk Blouse".to_string(),
            description: None,
            category_id: None,
            images: vec!["https://cdn.example/blouse-front.jpg".to_string()],
            sizes,
            colors: vec![],
            trade_price: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_price_for_size_matches_label() {
        let product = product_with_sizes(vec![
            SizeVariant {
                label: "S".to_string(),
                price: "450".parse().unwrap(),
                stock: 3,
            },
            SizeVariant {
                label: "M".to_string(),
                price: "500".parse().unwrap(),
                stock: 5,
            },
        ]);

        assert_eq!(product.price_for_size("M"), Some("500".parse().unwrap()));
        assert_eq!(product.price_for_size("XL"), None);
    }

    #[test]
    fn test_primary_image() {
        let product = product_with_sizes(vec![]);
        assert_eq!(
            product.primary_image(),
            Some("https://cdn.example/blouse-front.jpg")
        );
    }
}
