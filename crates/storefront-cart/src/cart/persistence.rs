//! Cart persistence.
//!
//! The cart is stored as three independent entries in a key-value store:
//!
//! | key                   | value                          |
//! |-----------------------|--------------------------------|
//! | `{ns}:cart`           | JSON array of line items       |
//! | `{ns}:coupon`         | coupon code string, or absent  |
//! | `{ns}:coupon_detail`  | coupon detail object, or absent|
//!
//! Shipping is not persisted; it is re-quoted after loading.

use crate::cart::{AppliedCoupon, CartLineItem, CartState, CouponCode, CouponDetail};
use crate::error::CartError;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use storefront_kv::{cache_key, Cache, KeyValueStore, MemoryStore};

/// Loads and saves cart snapshots through a [`KeyValueStore`].
#[derive(Clone)]
pub struct CartPersistence {
    cache: Cache<Arc<dyn KeyValueStore>>,
    items_key: String,
    coupon_key: String,
    detail_key: String,
}

impl std::fmt::Debug for CartPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartPersistence")
            .field("items_key", &self.items_key)
            .field("coupon_key", &self.coupon_key)
            .field("detail_key", &self.detail_key)
            .finish()
    }
}

impl CartPersistence {
    /// Persist into `store` under keys prefixed with `namespace`.
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self {
            cache: Cache::new(store),
            items_key: cache_key!(namespace, "cart"),
            coupon_key: cache_key!(namespace, "coupon"),
            detail_key: cache_key!(namespace, "coupon_detail"),
        }
    }

    /// Persistence into a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), "storefront")
    }

    /// Key holding the line items.
    pub fn items_key(&self) -> &str {
        &self.items_key
    }

    /// Restore the persisted cart.
    ///
    /// Missing or unreadable entries are treated as absent. A coupon code
    /// without its detail (or the reverse) restores no coupon at all.
    pub fn load(&self) -> CartState {
        let items: Vec<CartLineItem> = self.read(&self.items_key).unwrap_or_default();
        let code: Option<CouponCode> = self.read(&self.coupon_key);
        let detail: Option<CouponDetail> = self.read(&self.detail_key);

        let coupon = match (code, detail) {
            (Some(code), Some(detail)) => Some(AppliedCoupon { code, detail }),
            (None, None) => None,
            _ => {
                tracing::warn!("persisted coupon is incomplete, ignoring it");
                None
            }
        };

        tracing::debug!(items = items.len(), coupon = coupon.is_some(), "restored cart");
        CartState::restore(items, coupon)
    }

    /// Write a snapshot of `state`.
    ///
    /// Absent coupon state deletes its keys; an empty cart deletes the items key.
    pub fn save(&self, state: &CartState) -> Result<(), CartError> {
        if state.is_empty() {
            self.cache.delete(&self.items_key)?;
        } else {
            self.cache.set(&self.items_key, state.items())?;
        }
        let coupon = state.coupon();
        self.cache
            .set_or_delete(&self.coupon_key, coupon.map(|c| &c.code))?;
        self.cache
            .set_or_delete(&self.detail_key, coupon.map(|c| &c.detail))?;
        Ok(())
    }

    /// Remove every persisted entry.
    pub fn clear(&self) -> Result<(), CartError> {
        self.cache.delete(&self.items_key)?;
        self.cache.delete(&self.coupon_key)?;
        self.cache.delete(&self.detail_key)?;
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding unreadable persisted entry");
                None
            }
        }
    }
}
