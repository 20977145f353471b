//! # Totals Module
//!
//! Derived subtotal/shipping/total for the current cart.
//!
//! ## Shipping Rule
//! Flat fee, all-or-nothing:
//! ```text
//! subtotal == $0.00  ──►  shipping $0.00
//! subtotal  > $0.00  ──►  shipping $5.00
//! ```
//! A cart full of unknown products has a $0.00 subtotal and therefore
//! ships free; that is deliberate (unknown ids price at zero, and
//! nothing priced means nothing to ship a fee for).

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::money::Money;

/// Flat shipping fee applied to any non-zero subtotal.
pub const SHIPPING_FLAT_FEE: Money = Money::from_cents(500);

/// Totals summary computed from a cart and a catalog.
///
/// Ephemeral and never persisted; recompute instead of caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of price × quantity over all cart entries.
    pub subtotal: Money,

    /// Flat fee when the subtotal is positive, else zero.
    pub shipping: Money,

    /// Subtotal plus shipping.
    pub total: Money,
}

impl Totals {
    /// Computes totals for `cart` against `catalog`.
    ///
    /// Pure function: neither argument is mutated, unknown ids
    /// contribute $0.00.
    pub fn compute(cart: &Cart, catalog: &Catalog) -> Self {
        let subtotal = cart
            .items()
            .iter()
            .map(|line| catalog.price_of(&line.id).multiply_quantity(line.qty))
            .fold(Money::zero(), |acc, line_total| acc + line_total);

        let shipping = if subtotal.is_positive() {
            SHIPPING_FLAT_FEE
        } else {
            Money::zero()
        };

        Totals {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
