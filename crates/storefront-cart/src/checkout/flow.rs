//! Checkout flow state machine.

use crate::cart::CartView;
use crate::checkout::{PaymentReceipt, ShippingAddress};
use crate::error::CartError;
use crate::ids::OrderId;
use serde::{Deserialize, Serialize};

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    /// Cart review.
    Cart,
    /// Shipping address.
    Shipping,
    /// Bank transfer receipt upload.
    Payment,
    /// Order placed.
    Confirmation,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "cart",
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Confirmation => "confirmation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "Cart",
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Confirmation => "Confirmation",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Cart => 1,
            CheckoutStep::Shipping => 2,
            CheckoutStep::Payment => 3,
            CheckoutStep::Confirmation => 4,
        }
    }
}

/// Checkout flow state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutFlow {
    /// Current step.
    pub step: CheckoutStep,
    /// Completed steps.
    pub completed_steps: Vec<CheckoutStep>,
    /// Shipping address.
    pub shipping_address: Option<ShippingAddress>,
    /// Uploaded payment receipt.
    pub payment_receipt: Option<PaymentReceipt>,
    /// Set once the order service accepted the order.
    pub order_id: Option<OrderId>,
}

impl CheckoutFlow {
    /// Start checking out `cart`.
    pub fn start(cart: &CartView) -> Result<Self, CartError> {
        if cart.is_empty() {
            return Err(CartError::CheckoutIncomplete("cart is empty".to_string()));
        }
        Ok(Self {
            step: CheckoutStep::Cart,
            completed_steps: Vec::new(),
            shipping_address: None,
            payment_receipt: None,
            order_id: None,
        })
    }

    /// Check if checkout can advance to a step.
    pub fn can_advance_to(&self, step: CheckoutStep) -> bool {
        match step {
            CheckoutStep::Cart | CheckoutStep::Shipping => self.order_id.is_none(),
            CheckoutStep::Payment => {
                self.order_id.is_none()
                    && self
                        .shipping_address
                        .as_ref()
                        .map(|a| a.is_complete())
                        .unwrap_or(false)
            }
            CheckoutStep::Confirmation => self.order_id.is_some(),
        }
    }

    /// Advance to the next step.
    pub fn advance(&mut self) -> Result<CheckoutStep, CartError> {
        let next = match self.step {
            CheckoutStep::Cart => CheckoutStep::Shipping,
            CheckoutStep::Shipping => CheckoutStep::Payment,
            CheckoutStep::Payment => CheckoutStep::Confirmation,
            CheckoutStep::Confirmation => {
                return Err(CartError::InvalidCheckoutTransition {
                    from: "confirmation".to_string(),
                    to: "none".to_string(),
                })
            }
        };

        if !self.can_advance_to(next) {
            return Err(CartError::CheckoutIncomplete(
                self.missing_for_step(next).join(", "),
            ));
        }

        if !self.completed_steps.contains(&self.step) {
            self.completed_steps.push(self.step);
        }
        self.step = next;

        Ok(next)
    }

    /// Go back to the previous step. Not possible once the order is placed.
    pub fn go_back(&mut self) -> Result<CheckoutStep, CartError> {
        let prev = match self.step {
            CheckoutStep::Cart | CheckoutStep::Confirmation => {
                return Err(CartError::InvalidCheckoutTransition {
                    from: self.step.as_str().to_string(),
                    to: "previous".to_string(),
                })
            }
            CheckoutStep::Shipping => CheckoutStep::Cart,
            CheckoutStep::Payment => CheckoutStep::Shipping,
        };

        self.step = prev;

        Ok(prev)
    }

    /// Go to a specific step (if allowed).
    pub fn go_to(&mut self, step: CheckoutStep) -> Result<(), CartError> {
        let placed = self.order_id.is_some();
        if step == self.step || (!placed && self.completed_steps.contains(&step)) {
            self.step = step;
            Ok(())
        } else if self.can_advance_to(step) && step.number() == self.step.number() + 1 {
            self.advance()?;
            Ok(())
        } else {
            Err(CartError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: step.as_str().to_string(),
            })
        }
    }

    fn missing_for_step(&self, step: CheckoutStep) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match step {
            CheckoutStep::Payment => match &self.shipping_address {
                None => missing.push("shipping address"),
                Some(address) => missing.extend(address.missing_fields()),
            },
            CheckoutStep::Confirmation => {
                if self.payment_receipt.is_none() {
                    missing.push("payment receipt");
                }
                if self.order_id.is_none() {
                    missing.push("placed order");
                }
            }
            _ => {}
        }
        missing
    }

    /// Set the shipping address.
    pub fn set_shipping_address(&mut self, address: ShippingAddress) {
        self.shipping_address = Some(address);
    }

    /// Record the uploaded payment receipt.
    pub fn attach_payment_receipt(&mut self, receipt: PaymentReceipt) {
        self.payment_receipt = Some(receipt);
    }

    /// Record the accepted order and move to the confirmation step.
    pub(crate) fn confirm(&mut self, order_id: OrderId) {
        if !self.completed_steps.contains(&self.step) {
            self.completed_steps.push(self.step);
        }
        self.order_id = Some(order_id);
        self.step = CheckoutStep::Confirmation;
    }

    /// Check if the order has been placed.
    pub fn is_complete(&self) -> bool {
        self.step == CheckoutStep::Confirmation
    }

    /// Get progress percentage.
    pub fn progress_percent(&self) -> u8 {
        ((self.step.number() as f64 / 4.0) * 100.0) as u8
    }
}
