//! The shared cart store.
//!
//! Every mutation is funneled through [`CartStore`]: it updates the
//! [`CartState`], persists the snapshot, publishes a [`CartView`] to
//! subscribers and, when the line items changed, starts a shipping refresh.

use crate::cart::{
    AppliedCoupon, CartChange, CartPersistence, CartState, CartTotals, CartView, CouponCode,
};
use crate::catalog::ProductSnapshot;
use crate::config::CartConfig;
use crate::error::{CartError, GatewayError};
use crate::gateway::PricingGateway;
use crate::ids::ProductId;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Process-wide cart.
///
/// Cheap to clone; clones share the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<CartState>,
    gateway: Arc<dyn PricingGateway>,
    persistence: CartPersistence,
    destination_country: String,
    updates: watch::Sender<CartView>,
    refreshes: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &*self.inner.lock_state())
            .field("destination_country", &self.inner.destination_country)
            .finish()
    }
}

impl CartStore {
    /// Restore the cart from `persistence`.
    ///
    /// The persisted coupon is trusted without revalidation. A non-empty
    /// restored cart gets a shipping refresh right away.
    pub fn open(
        gateway: Arc<dyn PricingGateway>,
        persistence: CartPersistence,
        destination_country: impl Into<String>,
    ) -> Self {
        let state = persistence.load();
        let (updates, _) = watch::channel(state.view());
        let store = Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                gateway,
                persistence,
                destination_country: destination_country.into(),
                updates,
                refreshes: Mutex::new(Vec::new()),
            }),
        };
        store.inner.refresh_shipping();
        store
    }

    /// Open with the destination country and key namespace from `config`.
    pub fn with_config(
        gateway: Arc<dyn PricingGateway>,
        store: Arc<dyn storefront_kv::KeyValueStore>,
        config: &CartConfig,
    ) -> Self {
        let persistence = CartPersistence::new(store, &config.storage_namespace);
        Self::open(gateway, persistence, config.destination_country.clone())
    }

    /// Current snapshot.
    pub fn view(&self) -> CartView {
        self.inner.lock_state().view()
    }

    /// Snapshot for checkout: `None` while the shipping cost is not yet
    /// quoted for the current items.
    pub fn settled_view(&self) -> Option<CartView> {
        let state = self.inner.lock_state();
        state.shipping_settled().then(|| state.view())
    }

    /// Current totals.
    pub fn totals(&self) -> CartTotals {
        self.inner.lock_state().totals()
    }

    /// The applied coupon, if any.
    pub fn coupon(&self) -> Option<AppliedCoupon> {
        self.inner.lock_state().coupon().cloned()
    }

    /// Watch the cart. The receiver always holds the latest view.
    pub fn subscribe(&self) -> watch::Receiver<CartView> {
        self.inner.updates.subscribe()
    }

    /// Destination used for cart-level shipping quotes.
    pub fn destination_country(&self) -> &str {
        &self.inner.destination_country
    }

    /// Add units of a product, merging with an existing line item.
    pub fn add_item(
        &self,
        product: ProductSnapshot,
        quantity: i64,
    ) -> Result<CartChange, CartError> {
        self.inner.mutate(|state| state.add_item(product, quantity))
    }

    /// Set a line item's quantity; `quantity <= 0` removes it.
    pub fn update_quantity(
        &self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<CartChange, CartError> {
        self.inner
            .mutate(|state| state.update_quantity(product_id, quantity))
    }

    /// Remove a line item. No-op when absent.
    pub fn remove_item(&self, product_id: &ProductId) -> CartChange {
        self.inner
            .mutate(|state| Ok::<_, CartError>(state.remove_item(product_id)))
            .unwrap_or(CartChange::Unchanged)
    }

    /// Empty the cart, drop the coupon, and zero shipping.
    pub fn clear(&self) -> CartChange {
        let mut state = self.inner.lock_state();
        let change = state.clear();
        if let Err(e) = self.inner.persistence.clear() {
            tracing::warn!(error = %e, "failed to clear persisted cart");
        }
        self.inner.publish(&state);
        tracing::info!("cart cleared");
        change
    }

    /// Validate `raw` with the pricing service and apply it.
    ///
    /// On any failure the current coupon is left as it was. A validation that
    /// outlives a [`clear`](Self::clear) is dropped with
    /// [`CartError::CartCleared`].
    pub async fn apply_coupon(&self, raw: &str) -> Result<AppliedCoupon, CartError> {
        let code = CouponCode::parse(raw).ok_or(CartError::EmptyCouponCode)?;
        let epoch = self.inner.lock_state().epoch();

        let detail = match self.inner.gateway.validate_coupon(&code).await {
            Ok(detail) => detail,
            Err(GatewayError::Rejected(message)) => {
                tracing::info!(code = %code, %message, "coupon rejected");
                return Err(CartError::CouponRejected(message));
            }
            Err(GatewayError::Transport(message)) => {
                tracing::warn!(code = %code, error = %message, "coupon validation failed");
                return Err(CartError::Gateway(message));
            }
        };

        if detail.is_expired() {
            return Err(CartError::CouponRejected("Coupon has expired".to_string()));
        }

        let mut state = self.inner.lock_state();
        if state.epoch() != epoch {
            tracing::info!(code = %code, "cart cleared during coupon validation, dropping coupon");
            return Err(CartError::CartCleared);
        }
        let applied = AppliedCoupon { code, detail };
        state.set_coupon(applied.clone());
        self.inner.persist(&state);
        self.inner.publish(&state);
        tracing::info!(code = %applied.code, discount = %applied.detail.label(), "coupon applied");
        Ok(applied)
    }

    /// Drop the applied coupon. Returns whether one was set.
    pub fn remove_coupon(&self) -> bool {
        let mut state = self.inner.lock_state();
        let removed = state.remove_coupon();
        self.inner.persist(&state);
        self.inner.publish(&state);
        removed
    }

    /// Wait for every shipping refresh started so far.
    pub async fn wait_for_shipping(&self) {
        let pending: Vec<JoinHandle<()>> = std::mem::take(&mut *self.inner.lock_refreshes());
        for result in futures::future::join_all(pending).await {
            if let Err(e) = result {
                tracing::warn!(error = %e, "shipping refresh task failed");
            }
        }
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_refreshes(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.refreshes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a line-item mutation and run its side effects when it changed
    /// something.
    fn mutate<F>(self: &Arc<Self>, op: F) -> Result<CartChange, CartError>
    where
        F: FnOnce(&mut CartState) -> Result<CartChange, CartError>,
    {
        let change = {
            let mut state = self.lock_state();
            let change = op(&mut state)?;
            if change.items_changed() {
                self.persist(&state);
                self.publish(&state);
            }
            change
        };
        if change.items_changed() {
            self.refresh_shipping();
        }
        Ok(change)
    }

    fn persist(&self, state: &CartState) {
        if let Err(e) = self.persistence.save(state) {
            tracing::warn!(error = %e, "failed to persist cart");
        }
    }

    fn publish(&self, state: &CartState) {
        self.updates.send_replace(state.view());
    }

    /// Start a shipping quote for the current items.
    ///
    /// An empty cart already has zero shipping and needs no request.
    fn refresh_shipping(self: &Arc<Self>) {
        let Some(ticket) = self.lock_state().shipping_request(&self.destination_country) else {
            return;
        };
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("no async runtime, skipping shipping refresh");
            return;
        };

        let inner = Arc::clone(self);
        let handle = runtime.spawn(async move {
            let signature = ticket.signature;
            match inner.gateway.quote_shipping(&ticket.request).await {
                Ok(quote) => {
                    let mut state = inner.lock_state();
                    if state.apply_shipping_quote(signature, quote.cost) {
                        tracing::debug!(signature = signature.value(), cost = %quote.cost, "shipping quote applied");
                        inner.publish(&state);
                    } else {
                        tracing::debug!(
                            issued = signature.value(),
                            current = state.signature().value(),
                            "discarding stale shipping quote"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(signature = signature.value(), error = %e, "shipping quote failed");
                }
            }
        });

        let mut refreshes = self.lock_refreshes();
        refreshes.retain(|h| !h.is_finished());
        refreshes.push(handle);
    }
}
