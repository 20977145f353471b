//! # Change Notifications
//!
//! Two explicitly distinct delivery paths, never merged:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Notification Paths                                  │
//! │                                                                         │
//! │  INTRA-CONTEXT (same store)         CROSS-CONTEXT (sibling stores)      │
//! │  ──────────────────────────         ───────────────────────────────     │
//! │  • synchronous observer list        • CartBus (broadcast channel)       │
//! │  • fired inline by set()            • delivered on a listener task      │
//! │  • exactly once per set() call      • only when the value changed       │
//! │  • fires for the writer itself      • NEVER re-delivered to the writer  │
//! │                                                                         │
//! │  The asymmetry is the point: the writer hears about its own write       │
//! │  synchronously, siblings hear about it eventually. This mirrors how     │
//! │  browser storage events behave across tabs.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Subscription is register-only; there is no unsubscribe. Callers
//! that need to stop listening manage their own lifecycle (e.g. the
//! weak handle `auto_badge` uses).

use tokio::sync::broadcast;
use uuid::Uuid;

/// Capacity of the cross-context broadcast channel.
///
/// Delivery is best-effort; a slow listener that falls more than this
/// many events behind skips ahead (Lagged) rather than blocking
/// writers.
const BUS_CAPACITY: usize = 256;

/// Intra-context change observer.
///
/// Carries no payload, matching the original change event; observers
/// re-read the cart through the store if they need its contents.
/// `Arc` so the observer list can be cloned out of its lock before
/// invocation (observers may re-enter the store).
pub type ChangeCallback = std::sync::Arc<dyn Fn() + Send + Sync + 'static>;

/// A cross-context change event.
#[derive(Debug, Clone)]
pub struct CartEvent {
    /// Storage key whose value changed.
    pub key: String,

    /// Context id of the store that performed the write. Listeners
    /// drop events carrying their own id.
    pub writer: Uuid,
}

/// The cross-context notification channel.
///
/// Clone one bus into every store that should behave like a sibling
/// browsing context. Publishing never blocks; with no subscribers the
/// event is simply dropped.
#[derive(Debug, Clone)]
pub struct CartBus {
    tx: broadcast::Sender<CartEvent>,
}

impl CartBus {
    /// Creates a bus.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        CartBus { tx }
    }

    /// Publishes a change event to every subscribed context.
    pub fn publish(&self, event: CartEvent) {
        // send only fails with zero receivers, which is fine
        let _ = self.tx.send(event);
    }

    /// Subscribes; the receiver sees events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.tx.subscribe()
    }
}

impl Default for CartBus {
    fn default() -> Self {
        CartBus::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
