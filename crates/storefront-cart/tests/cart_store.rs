//! Cart store behavior against a scripted pricing service.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use storefront_cart::prelude::*;
use tokio::sync::Notify;

struct ScriptedGateway {
    coupons: HashMap<&'static str, Result<CouponDetail, GatewayError>>,
    rate_per_unit: f64,
    fail_shipping: AtomicBool,
    hold_first_quote: bool,
    released: Notify,
    hold_validation: bool,
    validation_started: Notify,
    validation_released: Notify,
    quote_calls: AtomicUsize,
    validate_calls: AtomicUsize,
}

impl ScriptedGateway {
    fn new() -> Self {
        let mut coupons = HashMap::new();
        coupons.insert("SAVE10", Ok(CouponDetail::fixed(10.0)));
        coupons.insert("TWENTY", Ok(CouponDetail::percentage(20.0)));
        coupons.insert(
            "OLD",
            Err(GatewayError::Rejected("Coupon has expired".to_string())),
        );
        Self {
            coupons,
            rate_per_unit: 2.0,
            fail_shipping: AtomicBool::new(false),
            hold_first_quote: false,
            released: Notify::new(),
            hold_validation: false,
            validation_started: Notify::new(),
            validation_released: Notify::new(),
            quote_calls: AtomicUsize::new(0),
            validate_calls: AtomicUsize::new(0),
        }
    }

    fn holding_first_quote() -> Self {
        Self {
            hold_first_quote: true,
            ..Self::new()
        }
    }

    fn holding_validation() -> Self {
        Self {
            hold_validation: true,
            ..Self::new()
        }
    }
}

#[async_trait]
impl PricingGateway for ScriptedGateway {
    async fn validate_coupon(&self, code: &CouponCode) -> Result<CouponDetail, GatewayError> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        if self.hold_validation {
            self.validation_started.notify_one();
            self.validation_released.notified().await;
        }
        self.coupons
            .get(code.as_str())
            .cloned()
            .unwrap_or_else(|| Err(GatewayError::Rejected("Invalid coupon code".to_string())))
    }

    async fn quote_shipping(
        &self,
        request: &ShippingQuoteRequest,
    ) -> Result<ShippingQuote, GatewayError> {
        let call = self.quote_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_shipping.load(Ordering::SeqCst) {
            return Err(GatewayError::Transport("connection refused".to_string()));
        }
        if self.hold_first_quote && call == 0 {
            self.released.notified().await;
        }
        let units: i64 = request.items.iter().map(|i| i.quantity).sum();
        let quote = ShippingQuote {
            cost: Money::new(self.rate_per_unit * units as f64),
        };
        if self.hold_first_quote && call == 1 {
            self.released.notify_one();
        }
        Ok(quote)
    }
}

#[derive(Default)]
struct ScriptedOrders {
    reject: bool,
    received: Mutex<Vec<OrderRequest>>,
}

#[async_trait]
impl OrderGateway for ScriptedOrders {
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderConfirmation, GatewayError> {
        if self.reject {
            return Err(GatewayError::Rejected("Receipt is unreadable".to_string()));
        }
        self.received.lock().unwrap().push(order.clone());
        Ok(OrderConfirmation {
            order_id: OrderId::new("ord-1001"),
            status: OrderStatus::Pending,
        })
    }
}

fn open(gateway: Arc<ScriptedGateway>, memory: &MemoryStore) -> CartStore {
    let persistence = CartPersistence::new(Arc::new(memory.clone()), "storefront");
    CartStore::open(gateway, persistence, "EG")
}

fn product(id: &str, price: f64, quantity: i64) -> ProductSnapshot {
    ProductSnapshot::new(id, id.to_uppercase(), price, quantity)
}

fn persisted_items(memory: &MemoryStore) -> Vec<CartLineItem> {
    memory
        .get("storefront:cart")
        .unwrap()
        .map(|bytes| serde_json::from_slice(&bytes).unwrap())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_item_count_tracks_quantities() {
    let memory = MemoryStore::new();
    let store = open(Arc::new(ScriptedGateway::new()), &memory);
    let mug = ProductId::new("mug");

    store.add_item(product("mug", 10.0, 20), 3).unwrap();
    store.add_item(product("cap", 5.0, 20), 2).unwrap();
    store.update_quantity(&mug, 7).unwrap();
    store.remove_item(&ProductId::new("cap"));
    store.add_item(product("pen", 1.0, 20), 1).unwrap();
    store.update_quantity(&mug, 0).unwrap();

    let view = store.view();
    let sum: i64 = view.items.iter().map(|i| i.cart_quantity).sum();
    assert_eq!(view.totals.item_count, sum);
    assert_eq!(view.totals.item_count, 1);

    let persisted = persisted_items(&memory);
    assert_eq!(persisted.len(), 1);
    assert!(persisted.iter().all(|i| i.cart_quantity >= 1));
}

#[tokio::test]
async fn test_repeated_add_equals_summed_add() {
    let twice = open(Arc::new(ScriptedGateway::new()), &MemoryStore::new());
    twice.add_item(product("mug", 10.0, 20), 2).unwrap();
    twice.add_item(product("mug", 10.0, 20), 3).unwrap();

    let once = open(Arc::new(ScriptedGateway::new()), &MemoryStore::new());
    once.add_item(product("mug", 10.0, 20), 5).unwrap();

    assert_eq!(twice.view().items, once.view().items);
    assert_eq!(twice.totals().subtotal, Money::new(50.0));
}

#[tokio::test]
async fn test_stock_limit() {
    let memory = MemoryStore::new();
    let store = open(Arc::new(ScriptedGateway::new()), &memory);
    let shirt = product("shirt", 30.0, 5).with_reserved(2);
    let id = ProductId::new("shirt");

    store.add_item(shirt, 1).unwrap();
    let before = store.view();

    let err = store.update_quantity(&id, 4).unwrap_err();
    assert!(matches!(err, CartError::InsufficientStock { available: 3, .. }));
    assert_eq!(store.view(), before);
    assert_eq!(persisted_items(&memory)[0].cart_quantity, 1);

    assert_eq!(store.update_quantity(&id, 3).unwrap(), CartChange::Updated);
    assert_eq!(store.view().items[0].cart_quantity, 3);
}

#[tokio::test]
async fn test_fixed_coupon() {
    let store = open(Arc::new(ScriptedGateway::new()), &MemoryStore::new());
    store.add_item(product("mug", 25.0, 10), 2).unwrap();

    let applied = store.apply_coupon(" save10 ").await.unwrap();
    assert_eq!(applied.code.as_str(), "SAVE10");
    store.wait_for_shipping().await;

    let totals = store.totals();
    assert_eq!(totals.subtotal, Money::new(50.0));
    assert_eq!(totals.discount, Money::new(10.0));
    assert_eq!(totals.shipping, Money::new(4.0));
    assert_eq!(totals.grand_total, Money::new(44.0));
}

#[tokio::test]
async fn test_fixed_coupon_capped_at_subtotal() {
    let store = open(Arc::new(ScriptedGateway::new()), &MemoryStore::new());
    store.add_item(product("pen", 5.0, 10), 1).unwrap();
    store.apply_coupon("SAVE10").await.unwrap();
    store.wait_for_shipping().await;

    let totals = store.totals();
    assert_eq!(totals.discount, Money::new(5.0));
    assert_eq!(totals.grand_total, Money::new(2.0));
}

#[tokio::test]
async fn test_percentage_coupon() {
    let store = open(Arc::new(ScriptedGateway::new()), &MemoryStore::new());
    store.add_item(product("lamp", 100.0, 10), 1).unwrap();
    store.apply_coupon("twenty").await.unwrap();
    assert_eq!(store.totals().discount, Money::new(20.0));
}

#[tokio::test]
async fn test_remove_coupon_reverts_totals() {
    let store = open(Arc::new(ScriptedGateway::new()), &MemoryStore::new());
    store.add_item(product("lamp", 100.0, 10), 1).unwrap();
    store.apply_coupon("TWENTY").await.unwrap();
    store.wait_for_shipping().await;

    assert!(store.remove_coupon());
    let totals = store.totals();
    assert!(store.coupon().is_none());
    assert_eq!(totals.discount, Money::zero());
    assert_eq!(totals.grand_total, totals.subtotal + totals.shipping);
}

#[tokio::test]
async fn test_rejected_coupon_keeps_current_one() {
    let store = open(Arc::new(ScriptedGateway::new()), &MemoryStore::new());
    store.add_item(product("lamp", 100.0, 10), 1).unwrap();
    store.apply_coupon("TWENTY").await.unwrap();

    let err = store.apply_coupon("old").await.unwrap_err();
    assert_eq!(err.to_string(), "Coupon has expired");
    let err = store.apply_coupon("bogus").await.unwrap_err();
    assert_eq!(err, CartError::CouponRejected("Invalid coupon code".to_string()));

    assert_eq!(store.coupon().unwrap().code.as_str(), "TWENTY");
}

#[tokio::test]
async fn test_blank_coupon_skips_gateway() {
    let gateway = Arc::new(ScriptedGateway::new());
    let store = open(gateway.clone(), &MemoryStore::new());
    assert_eq!(
        store.apply_coupon("   ").await,
        Err(CartError::EmptyCouponCode)
    );
    assert_eq!(gateway.validate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_clear_is_idempotent() {
    let memory = MemoryStore::new();
    let store = open(Arc::new(ScriptedGateway::new()), &memory);
    store.add_item(product("mug", 10.0, 10), 2).unwrap();
    store.apply_coupon("SAVE10").await.unwrap();
    store.wait_for_shipping().await;
    assert_eq!(store.totals().shipping, Money::new(4.0));

    assert_eq!(store.clear(), CartChange::Cleared);
    let once = store.view();
    assert_eq!(store.clear(), CartChange::Unchanged);
    let twice = store.view();

    assert_eq!(once.items, twice.items);
    assert_eq!(once.totals, twice.totals);
    assert!(twice.items.is_empty());
    assert!(twice.coupon.is_none());
    assert_eq!(twice.totals, CartTotals::default());
    assert!(memory.is_empty());
}

#[tokio::test]
async fn test_reload_roundtrip() {
    let memory = MemoryStore::new();
    let gateway = Arc::new(ScriptedGateway::new());
    let store = open(gateway.clone(), &memory);
    store.add_item(product("mug", 10.0, 10), 2).unwrap();
    store
        .add_item(product("ebook", 4.0, 0).with_availability(Availability::Unlimited), 3)
        .unwrap();
    store.update_quantity(&ProductId::new("mug"), 4).unwrap();
    store.apply_coupon("SAVE10").await.unwrap();
    store.wait_for_shipping().await;
    let before = store.view();
    let validations = gateway.validate_calls.load(Ordering::SeqCst);

    let reopened = open(gateway.clone(), &memory);
    let after = reopened.view();
    assert_eq!(after.items, before.items);
    assert_eq!(after.coupon, before.coupon);

    // Coupon is trusted, shipping is re-quoted
    assert_eq!(gateway.validate_calls.load(Ordering::SeqCst), validations);
    reopened.wait_for_shipping().await;
    assert_eq!(reopened.totals(), before.totals);
}

#[tokio::test]
async fn test_stale_quote_is_discarded() {
    let gateway = Arc::new(ScriptedGateway::holding_first_quote());
    let store = open(gateway.clone(), &MemoryStore::new());

    store.add_item(product("mug", 10.0, 10), 1).unwrap();
    store.add_item(product("mug", 10.0, 10), 1).unwrap();
    store.wait_for_shipping().await;

    assert_eq!(gateway.quote_calls.load(Ordering::SeqCst), 2);
    // Second quote (2 units) resolved first; the late one for 1 unit is ignored
    assert_eq!(store.totals().shipping, Money::new(4.0));
}

#[tokio::test]
async fn test_shipping_failure_keeps_last_quote() {
    let gateway = Arc::new(ScriptedGateway::new());
    let store = open(gateway.clone(), &MemoryStore::new());

    store.add_item(product("mug", 10.0, 10), 1).unwrap();
    store.wait_for_shipping().await;
    assert_eq!(store.totals().shipping, Money::new(2.0));

    gateway.fail_shipping.store(true, Ordering::SeqCst);
    store.add_item(product("mug", 10.0, 10), 1).unwrap();
    store.wait_for_shipping().await;
    assert_eq!(store.totals().shipping, Money::new(2.0));
    assert_eq!(store.view().totals.item_count, 2);
}

#[tokio::test]
async fn test_empty_cart_needs_no_quote() {
    let gateway = Arc::new(ScriptedGateway::new());
    let store = open(gateway.clone(), &MemoryStore::new());
    store.add_item(product("mug", 10.0, 10), 1).unwrap();
    store.wait_for_shipping().await;

    store.remove_item(&ProductId::new("mug"));
    store.wait_for_shipping().await;
    assert_eq!(store.totals().shipping, Money::zero());
    assert_eq!(gateway.quote_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_subscribers_see_changes() {
    let store = open(Arc::new(ScriptedGateway::new()), &MemoryStore::new());
    let mut updates = store.subscribe();
    assert!(updates.borrow().is_empty());

    store.add_item(product("mug", 10.0, 10), 2).unwrap();
    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().totals.item_count, 2);

    store.wait_for_shipping().await;
    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().totals.shipping, Money::new(4.0));

    // Failed mutations publish nothing
    let _ = store.add_item(product("mug", 10.0, 10), 50);
    assert!(!updates.has_changed().unwrap());
}

#[tokio::test]
async fn test_place_order_clears_cart() {
    let store = open(Arc::new(ScriptedGateway::new()), &MemoryStore::new());
    store.add_item(product("mug", 25.0, 10), 2).unwrap();
    store.apply_coupon("SAVE10").await.unwrap();
    store.wait_for_shipping().await;

    let mut flow = CheckoutFlow::start(&store.view()).unwrap();
    flow.advance().unwrap();
    flow.set_shipping_address(ShippingAddress::new(
        "Mona Said",
        "+20100000000",
        "12 Nile St",
        "Cairo",
        "EG",
    ));
    flow.advance().unwrap();

    let orders = ScriptedOrders::default();
    let err = place_order(&store, &orders, &mut flow).await.unwrap_err();
    assert_eq!(err, CartError::CheckoutIncomplete("payment receipt".to_string()));

    flow.attach_payment_receipt(PaymentReceipt::new("upl-77", "transfer.jpg"));
    let confirmation = place_order(&store, &orders, &mut flow).await.unwrap();

    assert_eq!(confirmation.order_id.as_str(), "ord-1001");
    assert_eq!(flow.step, CheckoutStep::Confirmation);
    assert!(store.view().is_empty());
    assert!(store.coupon().is_none());

    let received = orders.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].grand_total, Money::new(44.0));
    assert_eq!(received[0].payment_receipt.reference, "upl-77");
}

#[tokio::test]
async fn test_rejected_order_changes_nothing() {
    let store = open(Arc::new(ScriptedGateway::new()), &MemoryStore::new());
    store.add_item(product("mug", 25.0, 10), 1).unwrap();

    let mut flow = CheckoutFlow::start(&store.view()).unwrap();
    flow.advance().unwrap();
    flow.set_shipping_address(ShippingAddress::new("Mona", "+20", "Nile St", "Cairo", "EG"));
    flow.advance().unwrap();
    flow.attach_payment_receipt(PaymentReceipt::new("upl-1", "r.png"));

    let orders = ScriptedOrders {
        reject: true,
        ..Default::default()
    };
    let err = place_order(&store, &orders, &mut flow).await.unwrap_err();
    assert_eq!(err, CartError::OrderRejected("Receipt is unreadable".to_string()));
    assert_eq!(flow.step, CheckoutStep::Payment);
    assert_eq!(store.view().totals.item_count, 1);
}

#[tokio::test]
async fn test_place_order_right_after_change_uses_fresh_quote() {
    let store = open(Arc::new(ScriptedGateway::new()), &MemoryStore::new());
    store.add_item(product("mug", 10.0, 10), 1).unwrap();
    store.wait_for_shipping().await;
    store.add_item(product("cap", 5.0, 10), 2).unwrap();

    let mut flow = CheckoutFlow::start(&store.view()).unwrap();
    flow.advance().unwrap();
    flow.set_shipping_address(ShippingAddress::new("Mona", "+20", "Nile St", "Cairo", "EG"));
    flow.advance().unwrap();
    flow.attach_payment_receipt(PaymentReceipt::new("upl-2", "r.png"));

    let orders = ScriptedOrders::default();
    place_order(&store, &orders, &mut flow).await.unwrap();

    let received = orders.received.lock().unwrap();
    assert_eq!(received[0].shipping, Money::new(6.0));
    assert_eq!(received[0].grand_total, Money::new(26.0));
}

#[tokio::test]
async fn test_place_order_without_quote_is_refused() {
    let gateway = Arc::new(ScriptedGateway::new());
    gateway.fail_shipping.store(true, Ordering::SeqCst);
    let store = open(gateway.clone(), &MemoryStore::new());
    store.add_item(product("mug", 10.0, 10), 1).unwrap();

    let mut flow = CheckoutFlow::start(&store.view()).unwrap();
    flow.advance().unwrap();
    flow.set_shipping_address(ShippingAddress::new("Mona", "+20", "Nile St", "Cairo", "EG"));
    flow.advance().unwrap();
    flow.attach_payment_receipt(PaymentReceipt::new("upl-3", "r.png"));

    let orders = ScriptedOrders::default();
    let err = place_order(&store, &orders, &mut flow).await.unwrap_err();
    assert_eq!(err, CartError::CheckoutIncomplete("shipping quote".to_string()));
    assert_eq!(flow.step, CheckoutStep::Payment);
    assert_eq!(store.view().totals.item_count, 1);
    assert!(orders.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_during_coupon_validation_drops_coupon() {
    let memory = MemoryStore::new();
    let gateway = Arc::new(ScriptedGateway::holding_validation());
    let store = open(gateway.clone(), &memory);
    store.add_item(product("mug", 10.0, 10), 2).unwrap();

    let pending = tokio::spawn({
        let store = store.clone();
        async move { store.apply_coupon("save10").await }
    });
    gateway.validation_started.notified().await;
    store.clear();
    gateway.validation_released.notify_one();

    assert_eq!(pending.await.unwrap(), Err(CartError::CartCleared));
    assert!(store.coupon().is_none());
    assert_eq!(store.totals().discount, Money::zero());
    assert!(memory.is_empty());
}

#[test]
fn test_store_without_runtime_skips_shipping() {
    let store = open(Arc::new(ScriptedGateway::new()), &MemoryStore::new());
    store.add_item(product("mug", 10.0, 10), 1).unwrap();
    assert_eq!(store.totals().shipping, Money::zero());
    assert_eq!(store.totals().grand_total, Money::new(10.0));
}

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(ScriptedGateway::new());
    let config = CartConfig::default();

    let first = CartStore::with_config(
        gateway.clone(),
        Arc::new(FileStore::open(dir.path()).unwrap()),
        &config,
    );
    first.add_item(product("mug", 10.0, 10), 2).unwrap();
    first.wait_for_shipping().await;

    let second = CartStore::with_config(
        gateway,
        Arc::new(FileStore::open(dir.path()).unwrap()),
        &config,
    );
    assert_eq!(second.view().items, first.view().items);
}
