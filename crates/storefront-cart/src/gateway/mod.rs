//! Remote collaborators.
//!
//! The storefront owns no persistent state besides the shopper's cart: coupon
//! validity, shipping prices and orders all belong to the API server. These
//! traits are the only way the cart reaches it, so tests can substitute
//! scripted implementations.

mod http;

pub use http::HttpGateway;

use crate::cart::{CartLineItem, CouponCode, CouponDetail};
use crate::checkout::{OrderConfirmation, OrderRequest};
use crate::error::GatewayError;
use crate::ids::ProductId;
use crate::money::Money;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Coupon validation and shipping quotes.
#[async_trait]
pub trait PricingGateway: Send + Sync {
    /// Validate a normalized coupon code.
    ///
    /// Unknown, expired or exhausted codes are `GatewayError::Rejected` with a
    /// message meant for the shopper.
    async fn validate_coupon(&self, code: &CouponCode) -> Result<CouponDetail, GatewayError>;

    /// Quote shipping for a set of items to a destination country.
    async fn quote_shipping(
        &self,
        request: &ShippingQuoteRequest,
    ) -> Result<ShippingQuote, GatewayError>;
}

/// Order submission.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit an order. On success the server owns it.
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderConfirmation, GatewayError>;
}

/// One item of a shipping quote request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub price: Money,
}

/// Input of a shipping quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingQuoteRequest {
    pub items: Vec<QuoteItem>,
    /// ISO 3166-1 alpha-2 destination.
    pub country: String,
}

impl ShippingQuoteRequest {
    /// Build a request from cart line items.
    pub fn from_items(items: &[CartLineItem], country: impl Into<String>) -> Self {
        Self {
            items: items
                .iter()
                .map(|item| QuoteItem {
                    product_id: item.id().clone(),
                    quantity: item.cart_quantity,
                    price: item.unit_price(),
                })
                .collect(),
            country: country.into(),
        }
    }
}

/// A shipping price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ShippingQuote {
    pub cost: Money,
}
