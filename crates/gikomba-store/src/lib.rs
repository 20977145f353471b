//! # gikomba-store: Persistence + Notification Layer for Gikomba Cart
//!
//! This crate provides [`CartStore`], the component callers interact
//! with. It owns the single persisted cart slot and every side effect:
//! storage reads/writes, the two change-notification paths, the badge
//! helpers, and the receipt download boundary.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Gikomba Cart Data Flow                             │
//! │                                                                         │
//! │  Caller (page / app)                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  gikomba-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌──────────────┐    │   │
//! │  │   │   CartStore   │   │ Notifications │   │  Boundaries  │    │   │
//! │  │   │  (store.rs)   │   │  (notify.rs)  │   │              │    │   │
//! │  │   │               │   │               │   │ StorageBackend│   │   │
//! │  │   │ get/set/add   │──►│ observer list │   │ ReceiptSink  │    │   │
//! │  │   │ totals/receipt│   │ CartBus       │   │ BadgeTarget  │    │   │
//! │  │   └───────┬───────┘   └───────────────┘   └──────────────┘    │   │
//! │  │           │                                                     │   │
//! │  └───────────┼─────────────────────────────────────────────────────┘   │
//! │              ▼                                                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Persisted slot ("thrift_cart_simple")              │   │
//! │  │        MemoryBackend (tests) / FileBackend (on disk)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `CartStore` component and its operations
//! - [`backend`] - The injectable persistent key-value slot
//! - [`notify`] - Intra- and cross-context notification paths
//! - [`badge`] - Badge target trait + text implementation
//! - [`download`] - Receipt file-save boundary
//! - [`error`] - Error types for backends and boundaries
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use gikomba_core::{Catalog, Money};
//! use gikomba_store::{CartStore, MemoryBackend};
//!
//! let store = CartStore::new(Arc::new(MemoryBackend::new()));
//! store.add("tee-01", 2);
//!
//! let mut catalog = Catalog::new();
//! catalog.insert("tee-01", "Vintage Tee", Money::from_cents(1000));
//!
//! assert_eq!(store.count(), 2);
//! assert_eq!(store.totals(&catalog).total, Money::from_cents(2500));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod badge;
pub mod download;
pub mod error;
pub mod notify;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use badge::{BadgeTarget, TextBadge};
pub use download::{FileSink, NullSink, ReceiptSink};
pub use error::{StoreError, StoreResult};
pub use notify::{CartBus, CartEvent};
pub use store::{CartStore, CartStoreBuilder, CART_KEY};

// Core re-exports so most callers need only this crate
pub use gikomba_core::{Cart, CartLine, Catalog, Money, Product, ReceiptOptions, Totals};
