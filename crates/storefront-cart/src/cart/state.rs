//! Cart state transitions.
//!
//! [`CartState`] is the synchronous core of the cart: line items, the applied
//! coupon and the last shipping quote. It does no I/O. [`crate::CartStore`]
//! wraps it with persistence, remote calls and change notification.

use crate::cart::{AppliedCoupon, CartLineItem, CartTotals};
use crate::catalog::ProductSnapshot;
use crate::error::CartError;
use crate::gateway::ShippingQuoteRequest;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Identifies one version of the line-item list.
///
/// Bumped on every line-item change. A shipping quote computed for an older
/// signature describes a cart that no longer exists.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct CartSignature(u64);

impl CartSignature {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// What a mutation did to the line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line item was inserted.
    Added,
    /// An existing line item's quantity changed.
    Updated,
    /// A line item was dropped.
    Removed,
    /// All line items were dropped.
    Cleared,
    /// Nothing to do (e.g., removing an absent item).
    Unchanged,
}

impl CartChange {
    /// Whether the line-item list changed.
    pub fn items_changed(&self) -> bool {
        !matches!(self, CartChange::Unchanged)
    }
}

/// A shipping quote request tagged with the cart version it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteTicket {
    pub signature: CartSignature,
    pub request: ShippingQuoteRequest,
}

/// Read-only snapshot handed to observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineItem>,
    pub coupon: Option<AppliedCoupon>,
    pub totals: CartTotals,
    pub signature: CartSignature,
}

impl CartView {
    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    items: Vec<CartLineItem>,
    coupon: Option<AppliedCoupon>,
    shipping: Money,
    signature: CartSignature,
    quoted: Option<CartSignature>,
    epoch: u64,
}

impl CartState {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted parts.
    ///
    /// Items with a non-positive quantity are dropped, and only the first line
    /// item per product survives. The coupon is trusted as-is.
    pub fn restore(items: Vec<CartLineItem>, coupon: Option<AppliedCoupon>) -> Self {
        let mut restored: Vec<CartLineItem> = Vec::with_capacity(items.len());
        for item in items {
            if item.cart_quantity < 1 {
                tracing::warn!(product_id = %item.id(), quantity = item.cart_quantity, "dropping persisted line item with non-positive quantity");
                continue;
            }
            if restored.iter().any(|i| i.id() == item.id()) {
                tracing::warn!(product_id = %item.id(), "dropping duplicate persisted line item");
                continue;
            }
            restored.push(item);
        }
        Self {
            items: restored,
            coupon,
            shipping: Money::zero(),
            signature: CartSignature::default(),
            quoted: None,
            epoch: 0,
        }
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// The applied coupon.
    pub fn coupon(&self) -> Option<&AppliedCoupon> {
        self.coupon.as_ref()
    }

    /// Last applied shipping cost.
    pub fn shipping_cost(&self) -> Money {
        self.shipping
    }

    /// Current line-item version.
    pub fn signature(&self) -> CartSignature {
        self.signature
    }

    /// Whether the shipping cost was quoted for the current items.
    ///
    /// An empty cart is always settled at zero.
    pub fn shipping_settled(&self) -> bool {
        self.items.is_empty() || self.quoted == Some(self.signature)
    }

    /// Number of times the cart was cleared.
    ///
    /// An async operation that started before a clear must not write into
    /// the cart that replaced it.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by product ID.
    pub fn get_item(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.id() == product_id)
    }

    /// Derived totals.
    pub fn totals(&self) -> CartTotals {
        CartTotals::compute(
            &self.items,
            self.coupon.as_ref().map(|c| &c.detail),
            self.shipping,
        )
    }

    /// Snapshot for observers.
    pub fn view(&self) -> CartView {
        CartView {
            items: self.items.clone(),
            coupon: self.coupon.clone(),
            totals: self.totals(),
            signature: self.signature,
        }
    }

    /// Add units of a product.
    ///
    /// If the product is already in the cart its quantity becomes
    /// `current + quantity` and the stored snapshot is replaced by `product`,
    /// so stock is always checked against the latest snapshot. On failure
    /// nothing changes.
    pub fn add_item(
        &mut self,
        product: ProductSnapshot,
        quantity: i64,
    ) -> Result<CartChange, CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.id() == &product.id) {
            let new_quantity = item
                .cart_quantity
                .checked_add(quantity)
                .ok_or(CartError::InvalidQuantity(quantity))?;
            check_stock(&product, new_quantity)?;
            tracing::debug!(product_id = %product.id, from = item.cart_quantity, to = new_quantity, "merging line item");
            item.product = product;
            item.cart_quantity = new_quantity;
            self.touch_items();
            return Ok(CartChange::Updated);
        }

        check_stock(&product, quantity)?;
        tracing::debug!(product_id = %product.id, quantity, "adding line item");
        self.items.push(CartLineItem::new(product, quantity));
        self.touch_items();
        Ok(CartChange::Added)
    }

    /// Set the quantity of a line item.
    ///
    /// `quantity <= 0` removes the item. Unknown products are ignored.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<CartChange, CartError> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id));
        }

        let Some(item) = self.items.iter_mut().find(|i| i.id() == product_id) else {
            return Ok(CartChange::Unchanged);
        };
        if item.cart_quantity == quantity {
            return Ok(CartChange::Unchanged);
        }

        check_stock(&item.product, quantity)?;
        tracing::debug!(product_id = %product_id, from = item.cart_quantity, to = quantity, "updating quantity");
        item.cart_quantity = quantity;
        self.touch_items();
        Ok(CartChange::Updated)
    }

    /// Remove a line item; no-op when absent.
    pub fn remove_item(&mut self, product_id: &ProductId) -> CartChange {
        let len_before = self.items.len();
        self.items.retain(|i| i.id() != product_id);
        if self.items.len() < len_before {
            self.touch_items();
            CartChange::Removed
        } else {
            CartChange::Unchanged
        }
    }

    /// Empty the cart, drop the coupon, and zero shipping.
    pub fn clear(&mut self) -> CartChange {
        let had_items = !self.items.is_empty();
        self.items.clear();
        self.coupon = None;
        self.shipping = Money::zero();
        self.epoch = self.epoch.wrapping_add(1);
        if had_items {
            self.touch_items();
            CartChange::Cleared
        } else {
            CartChange::Unchanged
        }
    }

    /// Replace the applied coupon.
    pub fn set_coupon(&mut self, coupon: AppliedCoupon) {
        self.coupon = Some(coupon);
    }

    /// Drop the applied coupon. Returns whether one was set.
    pub fn remove_coupon(&mut self) -> bool {
        self.coupon.take().is_some()
    }

    /// The quote request for the current items, `None` for an empty cart.
    pub fn shipping_request(&self, country: &str) -> Option<QuoteTicket> {
        if self.items.is_empty() {
            return None;
        }
        Some(QuoteTicket {
            signature: self.signature,
            request: ShippingQuoteRequest::from_items(&self.items, country),
        })
    }

    /// Apply a shipping quote if it was computed for the current items.
    ///
    /// Returns `false` (and changes nothing) for a stale signature.
    pub fn apply_shipping_quote(&mut self, signature: CartSignature, cost: Money) -> bool {
        if signature != self.signature {
            return false;
        }
        self.shipping = cost.non_negative();
        self.quoted = Some(signature);
        true
    }

    fn touch_items(&mut self) {
        self.signature = self.signature.next();
        if self.items.is_empty() {
            self.shipping = Money::zero();
        }
    }
}

fn check_stock(product: &ProductSnapshot, quantity: i64) -> Result<(), CartError> {
    if product.can_fulfill(quantity) {
        return Ok(());
    }
    Err(CartError::InsufficientStock {
        product_id: product.id.to_string(),
        title: product.title.clone(),
        requested: quantity,
        available: product.available_stock(),
    })
}
