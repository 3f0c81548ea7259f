//! Product catalog module.
//!
//! The cart never owns catalog data; it keeps a snapshot of each product as
//! it looked when the shopper added it.

mod product;

pub use product::{Availability, ProductSnapshot};
