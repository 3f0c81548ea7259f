//! Coupon types.

use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A coupon code, trimmed and uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouponCode(String);

impl CouponCode {
    /// Normalize raw shopper input. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim().to_uppercase();
        if code.is_empty() {
            None
        } else {
            Some(Self(code))
        }
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type of discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// Percentage off the subtotal.
    Percentage,
    /// Fixed amount off, capped at the subtotal.
    Fixed,
}

impl DiscountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountKind::Percentage => "percentage",
            DiscountKind::Fixed => "fixed",
        }
    }
}

/// What the pricing service said about a coupon when it was validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CouponDetail {
    /// Type of discount.
    pub kind: DiscountKind,
    /// Percent (0-100) or fixed amount, depending on `kind`.
    pub value: f64,
    /// When the coupon stops being valid.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl CouponDetail {
    /// Create a percentage coupon.
    pub fn percentage(percent: f64) -> Self {
        Self {
            kind: DiscountKind::Percentage,
            value: percent,
            expires_at: None,
        }
    }

    /// Create a fixed-amount coupon.
    pub fn fixed(amount: f64) -> Self {
        Self {
            kind: DiscountKind::Fixed,
            value: amount,
            expires_at: None,
        }
    }

    /// Set the expiry.
    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Discount for a given subtotal, between zero and the subtotal.
    pub fn discount_for(&self, subtotal: Money) -> Money {
        let raw = match self.kind {
            DiscountKind::Percentage => subtotal.percentage(self.value),
            DiscountKind::Fixed => Money::new(self.value),
        };
        raw.min(subtotal).non_negative()
    }

    /// Check if the coupon had expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|ends| now > ends).unwrap_or(false)
    }

    /// Check if the coupon has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Short label such as "20% off" or "10.00 off".
    pub fn label(&self) -> String {
        match self.kind {
            DiscountKind::Percentage => format!("{}% off", self.value),
            DiscountKind::Fixed => format!("{} off", Money::new(self.value).display()),
        }
    }
}

/// A validated coupon held by the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedCoupon {
    /// Normalized code.
    pub code: CouponCode,
    /// Detail cached from the last successful validation.
    pub detail: CouponDetail,
}
