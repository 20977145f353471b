//! # Cart Store
//!
//! The component callers talk to. Owns the persisted slot and funnels
//! every mutation through the single write path, `set()`.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CartStore Operations                              │
//! │                                                                         │
//! │  Caller Action            Store Operation          Persisted Change     │
//! │  ─────────────            ───────────────          ────────────────     │
//! │                                                                         │
//! │  Add to cart ────────────► add(id, qty) ─────┐                          │
//! │  Change quantity ────────► set_qty(id, qty) ─┼───► set(cart) ──► slot   │
//! │  Remove line ────────────► remove(id) ───────┤          │               │
//! │  Empty the cart ─────────► clear() ──────────┘          │               │
//! │                                                         ▼               │
//! │  View cart ──────────────► get() / count()      intra observers fire    │
//! │  Checkout ───────────────► totals() / receipt   (sync, every set call)  │
//! │                                                         │               │
//! │                                                         ▼               │
//! │                                              bus publish, value changed │
//! │                                              only, skipped by writer    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fail-Soft Contract
//! No operation here returns an error. Corrupt or missing persisted
//! state reads as an empty cart; backend and sink failures are logged
//! with `warn!` and otherwise swallowed; empty ids are ignored.

use std::sync::{Arc, Mutex, Weak};

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};
use uuid::Uuid;

use gikomba_core::{receipt_text, Cart, CartLine, Catalog, ReceiptOptions, Totals};

use crate::backend::StorageBackend;
use crate::badge::BadgeTarget;
use crate::download::{NullSink, ReceiptSink};
use crate::notify::{CartBus, CartEvent, ChangeCallback};

/// Storage key for the persisted cart.
///
/// Compatibility constant: other consumers read the same key, so the
/// literal value must never change.
pub const CART_KEY: &str = "thrift_cart_simple";

/// Default filename for downloaded receipts.
const DEFAULT_RECEIPT_FILENAME: &str = "receipt.txt";

// =============================================================================
// Store Internals
// =============================================================================

struct StoreInner {
    /// The persisted slot.
    backend: Arc<dyn StorageBackend>,

    /// The file-save boundary for receipts.
    sink: Arc<dyn ReceiptSink>,

    /// Cross-context channel; absent for standalone stores.
    bus: Option<CartBus>,

    /// This store's context identity, used to filter the store's own
    /// writes out of the cross-context path.
    context_id: Uuid,

    /// Intra-context observers. Register-only; no unsubscribe.
    observers: Mutex<Vec<ChangeCallback>>,
}

impl StoreInner {
    /// Invokes every intra-context observer once.
    ///
    /// The list is cloned out from under the lock first so observers
    /// may freely call back into the store (including `on_change`).
    fn notify_observers(&self) {
        let observers: Vec<ChangeCallback> = self
            .observers
            .lock()
            .expect("observer mutex poisoned")
            .clone();
        for callback in observers {
            callback();
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`CartStore`].
///
/// The backend is mandatory; the receipt sink defaults to [`NullSink`]
/// and the bus to none (standalone context).
pub struct CartStoreBuilder {
    backend: Arc<dyn StorageBackend>,
    sink: Option<Arc<dyn ReceiptSink>>,
    bus: Option<CartBus>,
}

impl CartStoreBuilder {
    /// Sets the receipt sink.
    pub fn sink(mut self, sink: Arc<dyn ReceiptSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Joins a cross-context bus. Stores sharing a bus (and a backend)
    /// behave like sibling tabs.
    pub fn bus(mut self, bus: CartBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Builds the store.
    pub fn build(self) -> CartStore {
        CartStore {
            inner: Arc::new(StoreInner {
                backend: self.backend,
                sink: self.sink.unwrap_or_else(|| Arc::new(NullSink)),
                bus: self.bus,
                context_id: Uuid::new_v4(),
                observers: Mutex::new(Vec::new()),
            }),
        }
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// The cart store: persisted cart + derived computations + change
/// notifications.
///
/// Cheaply cloneable; clones share state and observers (they are the
/// same context). For a *sibling* context, build a second store over
/// the same backend and bus instead.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<StoreInner>,
}

impl CartStore {
    /// Starts building a store over `backend`.
    pub fn builder(backend: Arc<dyn StorageBackend>) -> CartStoreBuilder {
        CartStoreBuilder {
            backend,
            sink: None,
            bus: None,
        }
    }

    /// Creates a standalone store over `backend` with defaults.
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::builder(backend).build()
    }

    /// This store's context identity.
    pub fn context_id(&self) -> Uuid {
        self.inner.context_id
    }

    // =========================================================================
    // Read Path
    // =========================================================================

    /// Returns the current cart.
    ///
    /// Absent, unreadable, or corrupt persisted state all read as an
    /// empty cart; this never fails.
    pub fn get(&self) -> Cart {
        let raw = match self.inner.backend.read(CART_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "storage read failed, treating as empty cart");
                None
            }
        };
        match raw {
            None => Cart::new(),
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "corrupt cart value, treating as empty cart");
                Cart::new()
            }),
        }
    }

    /// Total quantity across all entries.
    pub fn count(&self) -> i64 {
        self.get().count()
    }

    /// Cart entries in insertion order.
    pub fn items(&self) -> Vec<CartLine> {
        self.get().items().to_vec()
    }

    /// Subtotal/shipping/total against the given catalog.
    pub fn totals(&self, catalog: &Catalog) -> Totals {
        self.get().totals(catalog)
    }

    // =========================================================================
    // Write Path
    // =========================================================================

    /// Replaces the persisted cart wholesale.
    ///
    /// This is the sole write path; every mutation funnels through it.
    /// Fires every intra-context observer exactly once per call, and
    /// publishes on the bus only when the stored value actually
    /// changed (the writer itself never hears the bus event).
    pub fn set(&self, cart: &Cart) {
        debug!(entries = cart.len(), "set cart");
        match serde_json::to_string(cart) {
            Ok(serialized) => {
                let previous = self.inner.backend.read(CART_KEY).unwrap_or_else(|e| {
                    warn!(error = %e, "storage read failed before write");
                    None
                });
                match self.inner.backend.write(CART_KEY, &serialized) {
                    Ok(()) => {
                        let changed = previous.as_deref() != Some(serialized.as_str());
                        if changed {
                            if let Some(bus) = &self.inner.bus {
                                bus.publish(CartEvent {
                                    key: CART_KEY.to_string(),
                                    writer: self.inner.context_id,
                                });
                            }
                        }
                    }
                    Err(e) => warn!(error = %e, "storage write failed"),
                }
            }
            Err(e) => warn!(error = %e, "cart serialization failed, write skipped"),
        }
        self.inner.notify_observers();
    }

    /// Empties the cart. Equivalent to `set` with an empty cart; the
    /// key stays present in storage.
    pub fn clear(&self) {
        debug!("clear cart");
        self.set(&Cart::new());
    }

    /// Adds `delta` (possibly negative) to the quantity for `id`.
    ///
    /// Empty ids are ignored. Any other call writes back, even when
    /// the net change is zero; see DESIGN.md for why that redundancy
    /// is kept.
    pub fn add(&self, id: &str, delta: i64) {
        if id.is_empty() {
            return;
        }
        debug!(id, delta, "add to cart");
        let mut cart = self.get();
        cart.add(id, delta);
        self.set(&cart);
    }

    /// Removes the entry for `id`. Writes back only when the id was
    /// actually present.
    pub fn remove(&self, id: &str) {
        if id.is_empty() {
            return;
        }
        debug!(id, "remove from cart");
        let mut cart = self.get();
        if cart.remove(id) {
            self.set(&cart);
        }
    }

    /// Sets the quantity for `id` to exactly `qty` (clamped at 0; 0
    /// removes the entry). Empty ids are ignored; any other call
    /// writes back.
    pub fn set_qty(&self, id: &str, qty: i64) {
        if id.is_empty() {
            return;
        }
        debug!(id, qty, "set cart quantity");
        let mut cart = self.get();
        cart.set_qty(id, qty);
        self.set(&cart);
    }

    // =========================================================================
    // Receipts
    // =========================================================================

    /// Renders the receipt for the current cart.
    ///
    /// Fills in a generated order id and the current local time when
    /// the options leave them out.
    pub fn receipt_text(&self, catalog: &Catalog, opts: &ReceiptOptions) -> String {
        receipt_text(&self.get(), catalog, opts)
    }

    /// Renders the receipt and hands it to the configured sink as a
    /// plain-text file. Sink failures are logged, not surfaced.
    pub fn download_receipt(&self, catalog: &Catalog, filename: Option<&str>) {
        let filename = filename.unwrap_or(DEFAULT_RECEIPT_FILENAME);
        debug!(filename, "download receipt");
        let text = self.receipt_text(catalog, &ReceiptOptions::default());
        if let Err(e) = self.inner.sink.deliver(filename, &text) {
            warn!(error = %e, filename, "receipt delivery failed");
        }
    }

    // =========================================================================
    // Badges
    // =========================================================================

    /// Writes the current count into `target` as text.
    pub fn render_badge(&self, target: &dyn BadgeTarget) {
        target.set_text(&self.count().to_string());
    }

    /// Renders `target` once now, then re-renders it on every change
    /// notification. The subscription is never removed; it holds the
    /// store only weakly, so it dies with the store.
    pub fn auto_badge(&self, target: Arc<dyn BadgeTarget>) {
        self.render_badge(target.as_ref());
        let weak = Arc::downgrade(&self.inner);
        self.on_change(move || {
            if let Some(inner) = weak.upgrade() {
                let store = CartStore { inner };
                store.render_badge(target.as_ref());
            }
        });
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Registers an intra-context observer, invoked synchronously on
    /// every `set()` in this context (and, once a bus listener is
    /// spawned, on cross-context changes too). No unsubscribe.
    pub fn on_change(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.inner
            .observers
            .lock()
            .expect("observer mutex poisoned")
            .push(Arc::new(callback));
    }

    /// Spawns the cross-context listener task: forwards bus events
    /// from *other* writers on this key into the local observers.
    ///
    /// Returns `None` when the store has no bus. Delivery is
    /// best-effort; a lagged listener skips ahead. The task holds the
    /// store weakly and exits once the store is dropped.
    pub fn spawn_bus_listener(&self) -> Option<tokio::task::JoinHandle<()>> {
        let bus = self.inner.bus.clone()?;
        let mut rx = bus.subscribe();
        let weak: Weak<StoreInner> = Arc::downgrade(&self.inner);
        Some(tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if event.key != CART_KEY {
                            continue;
                        }
                        let Some(inner) = weak.upgrade() else { break };
                        // The writer's own context is served by the
                        // intra path, never re-delivered from here.
                        if event.writer == inner.context_id {
                            continue;
                        }
                        debug!(writer = %event.writer, "cross-context cart change");
                        inner.notify_observers();
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "cross-context listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::badge::TextBadge;
    use crate::download::FileSink;
    use gikomba_core::Money;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn memory_store() -> (CartStore, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let store = CartStore::new(backend.clone());
        (store, backend)
    }

    fn counting_observer(store: &CartStore) -> Arc<AtomicUsize> {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        store.on_change(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        counter
    }

    /// Polls until `counter` reaches `expected` or a second passes.
    async fn wait_for(counter: &AtomicUsize, expected: usize) {
        for _ in 0..100 {
            if counter.load(Ordering::SeqCst) >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[test]
    fn test_get_on_fresh_backend_is_empty() {
        let (store, _) = memory_store();
        assert!(store.get().is_empty());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_get_on_corrupt_data_is_empty() {
        let (store, backend) = memory_store();
        backend.write(CART_KEY, "definitely not json").unwrap();
        assert!(store.get().is_empty());

        backend.write(CART_KEY, "[1,2,3]").unwrap();
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_persisted_format_is_a_json_object() {
        let (store, backend) = memory_store();
        store.add("tee", 2);

        let raw = backend.read(CART_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"{"tee":2}"#);
    }

    #[test]
    fn test_mutations_roundtrip_through_storage() {
        let (store, _) = memory_store();
        store.add("tee", 2);
        store.add("jeans", 1);
        store.set_qty("tee", 5);
        store.remove("jeans");

        let cart = store.get();
        assert_eq!(cart.qty("tee"), 5);
        assert!(!cart.contains("jeans"));
        assert_eq!(store.count(), 5);
    }

    #[test]
    fn test_clear_keeps_key_with_empty_object() {
        let (store, backend) = memory_store();
        store.add("tee", 2);
        store.clear();

        assert_eq!(backend.read(CART_KEY).unwrap().as_deref(), Some("{}"));
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_sibling_store_sees_writes_via_shared_backend() {
        let backend = Arc::new(MemoryBackend::new());
        let a = CartStore::new(backend.clone());
        let b = CartStore::new(backend);

        a.add("tee", 3);
        assert_eq!(b.count(), 3);
    }

    #[test]
    fn test_set_fires_exactly_one_intra_notification() {
        let (store, _) = memory_store();
        let counter = counting_observer(&store);

        store.set(&Cart::new());
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        store.add("tee", 1);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_id_mutations_do_not_notify() {
        let (store, backend) = memory_store();
        let counter = counting_observer(&store);

        store.add("", 5);
        store.set_qty("", 5);
        store.remove("");

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(backend.read(CART_KEY).unwrap(), None);
    }

    #[test]
    fn test_zero_delta_add_still_writes_and_notifies() {
        // Kept original behavior: the write path runs even when the
        // net quantity change is zero.
        let (store, _) = memory_store();
        let counter = counting_observer(&store);

        store.add("tee", 0);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_remove_of_absent_id_does_not_notify() {
        let (store, _) = memory_store();
        let counter = counting_observer(&store);

        store.remove("ghost");
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_observer_may_reenter_the_store() {
        let (store, _) = memory_store();
        let seen = Arc::new(AtomicUsize::new(0));
        let s = store.clone();
        let seen_inner = seen.clone();
        store.on_change(move || {
            // re-reading inside an observer must not deadlock
            seen_inner.store(s.count() as usize, Ordering::SeqCst);
        });

        store.add("tee", 4);
        assert_eq!(seen.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_render_badge_and_auto_badge() {
        let (store, _) = memory_store();
        let badge = Arc::new(TextBadge::new());

        store.auto_badge(badge.clone());
        assert_eq!(badge.text(), "0"); // rendered immediately

        store.add("tee", 2);
        store.add("jeans", 1);
        assert_eq!(badge.text(), "3"); // re-rendered per change
    }

    #[test]
    fn test_receipt_through_store() {
        let (store, _) = memory_store();
        store.add("tee", 2);

        let mut catalog = Catalog::new();
        catalog.insert("tee", "Vintage Tee", Money::from_cents(1000));

        let text = store.receipt_text(&catalog, &ReceiptOptions::with_order_id("ABC123"));
        assert!(text.contains("Order: ABC123"));
        assert!(text.contains("Vintage Tee x 2 @ $10.00 = $20.00"));
        assert!(text.contains("Total: $25.00"));
    }

    #[test]
    fn test_download_receipt_defaults_filename() {
        let dir = std::env::temp_dir().join(format!("gikomba-dl-{}", Uuid::new_v4()));
        let backend = Arc::new(MemoryBackend::new());
        let store = CartStore::builder(backend)
            .sink(Arc::new(FileSink::new(&dir)))
            .build();
        store.add("tee", 1);

        store.download_receipt(&Catalog::new(), None);

        let saved = std::fs::read_to_string(dir.join("receipt.txt")).unwrap();
        assert!(saved.contains("tee x 1"));
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_cross_context_delivery_skips_the_writer() {
        let backend = Arc::new(MemoryBackend::new());
        let bus = CartBus::new();
        let a = CartStore::builder(backend.clone()).bus(bus.clone()).build();
        let b = CartStore::builder(backend).bus(bus).build();

        let a_count = counting_observer(&a);
        let b_count = counting_observer(&b);
        let _a_task = a.spawn_bus_listener().unwrap();
        let _b_task = b.spawn_bus_listener().unwrap();

        a.add("tee", 1);
        // Writer is notified synchronously via the intra path only
        assert_eq!(a_count.load(Ordering::SeqCst), 1);

        // Sibling context hears it via the bus, eventually
        wait_for(&b_count, 1).await;
        assert_eq!(b_count.load(Ordering::SeqCst), 1);

        // Grace period: A must not receive its own event back
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(a_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unchanged_value_is_not_broadcast() {
        let backend = Arc::new(MemoryBackend::new());
        let bus = CartBus::new();
        let a = CartStore::builder(backend.clone()).bus(bus.clone()).build();
        let b = CartStore::builder(backend).bus(bus).build();

        let b_count = counting_observer(&b);
        let _b_task = b.spawn_bus_listener().unwrap();

        let mut cart = Cart::new();
        cart.add("tee", 2);
        a.set(&cart);
        wait_for(&b_count, 1).await;
        assert_eq!(b_count.load(Ordering::SeqCst), 1);

        // Same value again: intra fires in A, but nothing crosses
        a.set(&cart);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(b_count.load(Ordering::SeqCst), 1);
    }
}
