//! # Receipt Module
//!
//! Renders the plain-text receipt and generates short order ids.
//!
//! ## Receipt Layout
//! ```text
//! gikomba online — Receipt
//! Order: K3X9QZ
//! Date: 2026-08-27 14:03:11
//!
//! Vintage Tee x 2 @ $10.00 = $20.00
//! Denim Jacket x 1 @ $24.50 = $24.50
//!
//! Subtotal: $44.50
//! Shipping: $5.00
//! Total: $49.50
//! ```
//! An empty cart renders `No items.` as the only body line. Unknown
//! product ids fall back to the raw id as the name and $0.00 as the
//! price. Lines are joined with `\n`, no trailing newline.

use chrono::{DateTime, Local};
use rand::Rng;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::RECEIPT_BRANDING;

/// Alphabet for generated order ids: base-36, uppercase.
const ORDER_ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of generated order ids.
const ORDER_ID_LEN: usize = 6;

/// Timestamp format on receipts: local date + time, human-readable.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Options
// =============================================================================

/// Optional overrides for receipt rendering.
///
/// Both fields default to "fill in at render time" (a fresh order id,
/// the current local time). Tests inject both for determinism.
#[derive(Debug, Clone, Default)]
pub struct ReceiptOptions {
    /// Order id to print; a 6-char id is generated when absent.
    pub order_id: Option<String>,

    /// Timestamp to print; `Local::now()` when absent.
    pub issued_at: Option<DateTime<Local>>,
}

impl ReceiptOptions {
    /// Options with a caller-chosen order id.
    pub fn with_order_id(order_id: impl Into<String>) -> Self {
        ReceiptOptions {
            order_id: Some(order_id.into()),
            issued_at: None,
        }
    }
}

// =============================================================================
// Order Ids
// =============================================================================

/// Generates a short random order id: 6 uppercase base-36 characters.
///
/// Not globally unique, just unique enough to reference a receipt in
/// a conversation. Collisions are harmless.
pub fn generate_order_id() -> String {
    let mut rng = rand::rng();
    (0..ORDER_ID_LEN)
        .map(|_| ORDER_ID_ALPHABET[rng.random_range(0..ORDER_ID_ALPHABET.len())] as char)
        .collect()
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders the full receipt text for `cart` against `catalog`.
///
/// Header (branding, order id, date), blank line, one body line per
/// cart entry (or `No items.`), blank line, then the totals footer.
pub fn receipt_text(cart: &Cart, catalog: &Catalog, opts: &ReceiptOptions) -> String {
    let order_id = opts.order_id.clone().unwrap_or_else(generate_order_id);
    let issued_at = opts.issued_at.unwrap_or_else(Local::now);

    let mut lines = vec![
        RECEIPT_BRANDING.to_string(),
        format!("Order: {}", order_id),
        format!("Date: {}", issued_at.format(DATE_FORMAT)),
        String::new(),
    ];

    if cart.is_empty() {
        lines.push("No items.".to_string());
    } else {
        for line in cart.items() {
            let price = catalog.price_of(&line.id);
            let line_total = price.multiply_quantity(line.qty);
            lines.push(format!(
                "{} x {} @ {} = {}",
                catalog.name_of(&line.id),
                line.qty,
                price,
                line_total
            ));
        }
    }

    let totals = cart.totals(catalog);
    lines.push(String::new());
    lines.push(format!("Subtotal: {}", totals.subtotal));
    lines.push(format!("Shipping: {}", totals.shipping));
    lines.push(format!("Total: {}", totals.total));

    lines.join("\n")
}

// =============================================================================
// Unit Tests
// =============================================================================
