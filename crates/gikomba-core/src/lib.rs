//! # gikomba-core: Pure Cart Logic for Gikomba Cart
//!
//! This crate is the **heart** of Gikomba Cart. It contains the cart
//! mapping, money arithmetic, catalog types, totals computation, and
//! receipt rendering as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Gikomba Cart Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Caller (page / app)                          │   │
//! │  │    add to cart ──► badge updates ──► receipt download           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 gikomba-store (CartStore)                       │   │
//! │  │    persisted slot, change notifications, boundaries             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ gikomba-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │   money   │  │  catalog  │  │  receipt  │  │   │
//! │  │   │   Cart    │  │   Money   │  │  Product  │  │  rendering│  │   │
//! │  │   │  CartLine │  │           │  │  Catalog  │  │  order ids│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO UI • PURE FUNCTIONS                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - The cart mapping (product-id → quantity)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - Caller-supplied product reference
//! - [`totals`] - Derived subtotal/shipping/total
//! - [`receipt`] - Receipt text rendering and order-id generation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Same cart + same catalog = same output
//! 2. **No I/O**: Storage, UI, and downloads live in gikomba-store
//! 3. **Integer Money**: All monetary values are in cents (i64)
//! 4. **Fail-Soft**: Unknown ids degrade to name=id, price=$0.00
//!
//! ## Example Usage
//!
//! ```rust
//! use gikomba_core::{Cart, Catalog, Money};
//!
//! let mut cart = Cart::new();
//! cart.add("tee-01", 2);
//!
//! let mut catalog = Catalog::new();
//! catalog.insert("tee-01", "Vintage Tee", Money::from_cents(1000));
//!
//! let totals = cart.totals(&catalog);
//! assert_eq!(totals.subtotal, Money::from_cents(2000));
//! assert_eq!(totals.total, Money::from_cents(2500)); // + $5.00 shipping
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod money;
pub mod receipt;
pub mod totals;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use gikomba_core::Cart` instead of
// `use gikomba_core::cart::Cart`.

pub use cart::{Cart, CartLine};
pub use catalog::{Catalog, Product};
pub use money::Money;
pub use receipt::{generate_order_id, receipt_text, ReceiptOptions};
pub use totals::{Totals, SHIPPING_FLAT_FEE};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Branding line printed at the top of every receipt.
///
/// Fixed by the receipt format; changing it changes what customers see
/// on downloaded receipts.
pub const RECEIPT_BRANDING: &str = "gikomba online — Receipt";
