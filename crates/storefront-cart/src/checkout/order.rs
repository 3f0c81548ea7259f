//! Order types.

use crate::cart::{CartLineItem, CartView, CouponCode};
use crate::checkout::ShippingAddress;
use crate::ids::{OrderId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Order status as reported by the order service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, waiting for the payment receipt to be reviewed.
    #[default]
    Pending,
    /// Payment verified.
    Confirmed,
    /// Handed to the courier.
    Shipped,
    /// Delivered.
    Delivered,
    /// Cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

/// A bank transfer receipt the shopper uploaded on the payment step.
///
/// The upload itself goes to the API server; the cart only keeps the
/// reference it returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentReceipt {
    /// Server-side reference of the uploaded file.
    pub reference: String,
    /// Original file name, for display.
    pub file_name: String,
}

impl PaymentReceipt {
    pub fn new(reference: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            file_name: file_name.into(),
        }
    }
}

/// A line item in an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub title: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total: Money,
}

impl From<&CartLineItem> for OrderLineItem {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.id().clone(),
            title: item.product.title.clone(),
            quantity: item.cart_quantity,
            unit_price: item.unit_price(),
            total: item.line_total(),
        }
    }
}

/// Order submitted to the order service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    pub items: Vec<OrderLineItem>,
    pub coupon_code: Option<CouponCode>,
    pub subtotal: Money,
    pub discount: Money,
    pub shipping: Money,
    pub grand_total: Money,
    pub shipping_address: ShippingAddress,
    pub payment_receipt: PaymentReceipt,
}

impl OrderRequest {
    /// Build a request from a cart snapshot.
    pub fn from_cart(
        cart: &CartView,
        shipping_address: ShippingAddress,
        payment_receipt: PaymentReceipt,
    ) -> Self {
        Self {
            items: cart.items.iter().map(OrderLineItem::from).collect(),
            coupon_code: cart.coupon.as_ref().map(|c| c.code.clone()),
            subtotal: cart.totals.subtotal,
            discount: cart.totals.discount,
            shipping: cart.totals.shipping,
            grand_total: cart.totals.grand_total,
            shipping_address,
            payment_receipt,
        }
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// What the order service returns for an accepted order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    #[serde(default)]
    pub status: OrderStatus,
}
