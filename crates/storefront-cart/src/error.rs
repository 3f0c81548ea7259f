//! Cart error types.
//!
//! The `Display` text of every variant is written for the shopper: the UI
//! layer shows it verbatim in a toast.

use thiserror::Error;

/// Errors that can occur in cart and checkout operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CartError {
    /// Quantity to add was not positive.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Not enough stock for the requested quantity.
    #[error("Only {available} of \"{title}\" available (requested {requested})")]
    InsufficientStock {
        product_id: String,
        title: String,
        requested: i64,
        available: i64,
    },

    /// Coupon code was blank after normalization.
    #[error("Please enter a coupon code")]
    EmptyCouponCode,

    /// The cart was cleared while a coupon was being validated.
    #[error("The cart was cleared before the coupon could be applied")]
    CartCleared,

    /// The pricing service refused the coupon.
    #[error("{0}")]
    CouponRejected(String),

    /// The remote API could not be reached or answered garbage.
    #[error("Service unavailable: {0}")]
    Gateway(String),

    /// The order service refused the order.
    #[error("Order was not accepted: {0}")]
    OrderRejected(String),

    /// Checkout step requirements not met.
    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(String),

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    /// Persistent storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be read.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<storefront_kv::CacheError> for CartError {
    fn from(e: storefront_kv::CacheError) -> Self {
        CartError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CartError {
    fn from(e: serde_json::Error) -> Self {
        CartError::Serialization(e.to_string())
    }
}

/// Errors returned by a remote gateway.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The remote side understood the request and said no.
    #[error("{0}")]
    Rejected(String),

    /// Network failure, server error, or an unreadable response.
    #[error("{0}")]
    Transport(String),
}

impl From<storefront_fetch::FetchError> for GatewayError {
    fn from(e: storefront_fetch::FetchError) -> Self {
        GatewayError::Transport(e.to_string())
    }
}
