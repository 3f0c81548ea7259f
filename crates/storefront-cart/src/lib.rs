//! Shopping cart state for the storefront.
//!
//! This crate holds everything the storefront keeps on the shopper's side:
//!
//! - **Catalog**: product snapshots with stock and availability
//! - **Cart**: line items, coupons, totals, persistence, and the shared store
//! - **Gateway**: the remote pricing, shipping and order services
//! - **Checkout**: the cart → shipping → payment → confirmation flow
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_cart::prelude::*;
//! use std::sync::Arc;
//!
//! let config = CartConfig::default();
//! let gateway = Arc::new(HttpGateway::from_config(&config));
//! let store = CartStore::with_config(gateway, Arc::new(MemoryStore::new()), &config);
//!
//! store.add_item(ProductSnapshot::new("mug", "Mug", 12.5, 10), 2)?;
//! store.apply_coupon("save10").await?;
//! store.wait_for_shipping().await;
//!
//! println!("Total: {}", store.totals().grand_total.display());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod gateway;

pub use cart::{CartStore, CartView};
pub use config::CartConfig;
pub use error::{CartError, GatewayError};
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::CartConfig;
    pub use crate::error::{CartError, GatewayError};
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{Availability, ProductSnapshot};

    // Cart
    pub use crate::cart::{
        AppliedCoupon, CartChange, CartLineItem, CartPersistence, CartSignature, CartState,
        CartStore, CartTotals, CartView, CouponCode, CouponDetail, DiscountKind,
    };

    // Gateway
    pub use crate::gateway::{
        HttpGateway, OrderGateway, PricingGateway, ShippingQuote, ShippingQuoteRequest,
    };

    // Checkout
    pub use crate::checkout::{
        place_order, CheckoutFlow, CheckoutStep, OrderConfirmation, OrderRequest, OrderStatus,
        PaymentReceipt, ShippingAddress,
    };

    pub use storefront_kv::{FileStore, KeyValueStore, MemoryStore};
}
