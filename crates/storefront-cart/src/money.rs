//! Money type for representing monetary values.
//!
//! Amounts are plain `f64` values in the store currency, exactly as the API
//! server sends them. Arithmetic never rounds; only [`Money::rounded`] and
//! [`Money::display`] do, so repeated add/remove cycles do not accumulate
//! rounding error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

/// A monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(f64);

impl Money {
    /// Create a new amount.
    pub const fn new(amount: f64) -> Self {
        Self(amount)
    }

    /// Zero.
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// The raw, unrounded amount.
    pub fn amount(&self) -> f64 {
        self.0
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Multiply by a quantity.
    pub fn times(&self, quantity: i64) -> Money {
        Money(self.0 * quantity as f64)
    }

    /// Calculate a percentage of this amount.
    pub fn percentage(&self, percent: f64) -> Money {
        Money(self.0 * percent / 100.0)
    }

    /// The smaller of two amounts.
    pub fn min(self, other: Money) -> Money {
        if other.0 < self.0 {
            other
        } else {
            self
        }
    }

    /// Clamp negative amounts (and NaN) to zero.
    pub fn non_negative(self) -> Money {
        if self.0 > 0.0 {
            self
        } else {
            Money::zero()
        }
    }

    /// Round half away from zero to two decimal places.
    pub fn rounded(&self) -> f64 {
        (self.0 * 100.0).round() / 100.0
    }

    /// Format as a two-decimal string (e.g., "49.99").
    pub fn display(&self) -> String {
        format!("{:.2}", self.rounded())
    }
}

impl From<f64> for Money {
    fn from(amount: f64) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, quantity: i64) -> Money {
        self.times(quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
