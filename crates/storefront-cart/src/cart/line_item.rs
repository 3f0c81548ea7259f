//! Cart line items.

use crate::catalog::ProductSnapshot;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product in the cart together with the number of units selected.
///
/// Serialized flat: every product snapshot field plus `cart_quantity`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineItem {
    /// The product as of the latest add.
    #[serde(flatten)]
    pub product: ProductSnapshot,
    /// Units selected by the shopper, always at least 1.
    pub cart_quantity: i64,
}

impl CartLineItem {
    pub(crate) fn new(product: ProductSnapshot, cart_quantity: i64) -> Self {
        Self {
            product,
            cart_quantity,
        }
    }

    /// Product identifier (the line item's identity).
    pub fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Unit price.
    pub fn unit_price(&self) -> Money {
        self.product.price
    }

    /// `unit_price * cart_quantity`.
    pub fn line_total(&self) -> Money {
        self.product.price.times(self.cart_quantity)
    }
}
