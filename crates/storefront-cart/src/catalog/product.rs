//! Product snapshot types.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// How a product's availability is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Limited by `quantity - reserved`.
    #[default]
    Stock,
    /// Sold before it is produced; stock is not checked.
    Preorder,
    /// Always available (digital goods, made to order).
    Unlimited,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Stock => "stock",
            Availability::Preorder => "preorder",
            Availability::Unlimited => "unlimited",
        }
    }

    /// Whether stock limits apply.
    pub fn is_stock_tracked(&self) -> bool {
        matches!(self, Availability::Stock)
    }
}

/// A product as the shopper saw it when adding it to the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    /// Product identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Money,
    /// Image URLs, first one is the thumbnail.
    #[serde(default)]
    pub images: Vec<String>,
    /// Units in stock.
    #[serde(default)]
    pub quantity: i64,
    /// Units held for pending orders.
    #[serde(default)]
    pub reserved: i64,
    /// Availability mode.
    #[serde(default)]
    pub availability: Availability,
}

impl ProductSnapshot {
    /// Create a stock-tracked product with no reservations.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        price: impl Into<Money>,
        quantity: i64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price: price.into(),
            images: Vec::new(),
            quantity,
            reserved: 0,
            availability: Availability::Stock,
        }
    }

    /// Set the reserved quantity.
    pub fn with_reserved(mut self, reserved: i64) -> Self {
        self.reserved = reserved;
        self
    }

    /// Set the availability mode.
    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Add an image URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    /// Units that can still be sold: `quantity - reserved`, never negative.
    pub fn available_stock(&self) -> i64 {
        (self.quantity - self.reserved).max(0)
    }

    /// Whether `quantity` units can be placed in the cart.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        !self.availability.is_stock_tracked() || quantity <= self.available_stock()
    }

    /// Whether a stock-tracked product has nothing left.
    pub fn is_out_of_stock(&self) -> bool {
        self.availability.is_stock_tracked() && self.available_stock() == 0
    }

    /// Thumbnail image, if any.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_stock() {
        let product = ProductSnapshot::new("p1", "Mug", 12.0, 10).with_reserved(3);
        assert_eq!(product.available_stock(), 7);
        assert!(product.can_fulfill(7));
        assert!(!product.can_fulfill(8));
    }

    #[test]
    fn test_over_reserved_is_zero_not_negative() {
        let product = ProductSnapshot::new("p1", "Mug", 12.0, 2).with_reserved(5);
        assert_eq!(product.available_stock(), 0);
        assert!(product.is_out_of_stock());
    }

    #[test]
    fn test_untracked_ignores_stock() {
        let product = ProductSnapshot::new("p1", "E-book", 9.0, 0)
            .with_availability(Availability::Unlimited);
        assert!(product.can_fulfill(1000));
        assert!(!product.is_out_of_stock());

        let preorder = ProductSnapshot::new("p2", "Vinyl", 30.0, 0)
            .with_availability(Availability::Preorder);
        assert!(preorder.can_fulfill(5));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let product: ProductSnapshot =
            serde_json::from_str(r#"{"id": "p9", "title": "Cap", "price": 15.5}"#).unwrap();
        assert_eq!(product.availability, Availability::Stock);
        assert_eq!(product.available_stock(), 0);
        assert_eq!(product.thumbnail(), None);
    }

    #[test]
    fn test_thumbnail_is_first_image() {
        let product = ProductSnapshot::new("p1", "Mug", 12.0, 1)
            .with_image("https://cdn/a.jpg")
            .with_image("https://cdn/b.jpg");
        assert_eq!(product.thumbnail(), Some("https://cdn/a.jpg"));
    }
}
