//! Checkout module.
//!
//! Contains the checkout flow, shipping address, order types, and order
//! placement.

mod address;
mod flow;
mod order;

pub use address::ShippingAddress;
pub use flow::{CheckoutFlow, CheckoutStep};
pub use order::{OrderConfirmation, OrderLineItem, OrderRequest, OrderStatus, PaymentReceipt};

use crate::cart::CartStore;
use crate::error::{CartError, GatewayError};
use crate::gateway::OrderGateway;

/// Submit the cart as an order.
///
/// The flow must be on the payment step with a complete address and a
/// receipt. Pending shipping refreshes are awaited first, and the order is
/// refused while the shipping cost is not quoted for the current items. On
/// success the order id is recorded, the flow moves to
/// confirmation and the cart is cleared. On failure nothing changes.
pub async fn place_order(
    cart: &CartStore,
    gateway: &dyn OrderGateway,
    flow: &mut CheckoutFlow,
) -> Result<OrderConfirmation, CartError> {
    if flow.step != CheckoutStep::Payment {
        return Err(CartError::InvalidCheckoutTransition {
            from: flow.step.as_str().to_string(),
            to: CheckoutStep::Confirmation.as_str().to_string(),
        });
    }
    let address = match &flow.shipping_address {
        Some(address) if address.is_complete() => address.clone(),
        _ => return Err(CartError::CheckoutIncomplete("shipping address".to_string())),
    };
    let receipt = flow
        .payment_receipt
        .clone()
        .ok_or_else(|| CartError::CheckoutIncomplete("payment receipt".to_string()))?;

    cart.wait_for_shipping().await;
    let view = cart
        .settled_view()
        .ok_or_else(|| CartError::CheckoutIncomplete("shipping quote".to_string()))?;
    if view.is_empty() {
        return Err(CartError::CheckoutIncomplete("cart is empty".to_string()));
    }

    let request = OrderRequest::from_cart(&view, address, receipt);
    let confirmation = gateway.place_order(&request).await.map_err(|e| match e {
        GatewayError::Rejected(message) => CartError::OrderRejected(message),
        GatewayError::Transport(message) => CartError::Gateway(message),
    })?;

    tracing::info!(
        order_id = %confirmation.order_id,
        total = %request.grand_total,
        "order placed"
    );
    flow.confirm(confirmation.order_id.clone());
    cart.clear();
    Ok(confirmation)
}
