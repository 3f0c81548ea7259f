//! Shopping cart module.
//!
//! Contains line items, coupons, totals, the cart state machine, its
//! persistence, and the shared store.

mod coupon;
mod line_item;
mod persistence;
pub mod pricing;
mod state;
mod store;

pub use coupon::{AppliedCoupon, CouponCode, CouponDetail, DiscountKind};
pub use line_item::CartLineItem;
pub use persistence::CartPersistence;
pub use pricing::CartTotals;
pub use state::{CartChange, CartSignature, CartState, CartView, QuoteTicket};
pub use store::CartStore;
