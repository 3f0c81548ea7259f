//! Cart totals.
//!
//! Pure functions of line items, coupon and shipping cost. Nothing here is
//! stored; the store recomputes totals on every read.

use crate::cart::{CartLineItem, CouponDetail};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Σ(unit price × cart quantity).
pub fn subtotal(items: &[CartLineItem]) -> Money {
    items.iter().map(CartLineItem::line_total).sum()
}

/// Σ(cart quantity).
pub fn item_count(items: &[CartLineItem]) -> i64 {
    items.iter().map(|i| i.cart_quantity).sum()
}

/// Discount granted by `coupon` on `subtotal`; zero without a coupon.
pub fn discount_amount(subtotal: Money, coupon: Option<&CouponDetail>) -> Money {
    coupon
        .map(|c| c.discount_for(subtotal))
        .unwrap_or_else(Money::zero)
}

/// `max(0, subtotal - discount + shipping)`.
pub fn grand_total(subtotal: Money, discount: Money, shipping: Money) -> Money {
    (subtotal - discount + shipping).non_negative()
}

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct CartTotals {
    /// Units in the cart.
    pub item_count: i64,
    /// Subtotal before discounts.
    pub subtotal: Money,
    /// Coupon discount.
    pub discount: Money,
    /// Shipping cost from the last applied quote.
    pub shipping: Money,
    /// Final total.
    pub grand_total: Money,
}

impl CartTotals {
    /// Compute totals from cart contents.
    pub fn compute(
        items: &[CartLineItem],
        coupon: Option<&CouponDetail>,
        shipping: Money,
    ) -> Self {
        let subtotal = subtotal(items);
        let discount = discount_amount(subtotal, coupon);
        Self {
            item_count: item_count(items),
            subtotal,
            discount,
            shipping,
            grand_total: grand_total(subtotal, discount, shipping),
        }
    }

    /// Check if a discount is applied.
    pub fn has_discount(&self) -> bool {
        self.discount.amount() > 0.0
    }

    /// Get discount percentage of subtotal.
    pub fn discount_percentage(&self) -> f64 {
        if self.subtotal.amount() <= 0.0 {
            return 0.0;
        }
        self.discount.amount() / self.subtotal.amount() * 100.0
    }
}
