//! # Cart Module
//!
//! The cart mapping: product-id → quantity.
//!
//! ## Invariants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Invariants                                  │
//! │                                                                         │
//! │  • Ids are unique and non-empty                                         │
//! │  • Every stored quantity is strictly positive                           │
//! │    (an entry that would reach 0 is removed, never stored as 0)          │
//! │  • Iteration order is insertion order (not sorted, not meaningful)      │
//! │                                                                         │
//! │  add(id, -n) is therefore a legitimate way to remove an item:           │
//! │    add("tee", 2) ──► qty 2                                              │
//! │    add("tee", -2) ──► clamped to 0 ──► entry removed                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! A `Cart` serializes as a flat JSON object, `{"<id>": <qty>, ...}`.
//! This is the exact shape the original storage consumers read and
//! write, so it must not change. Deserialization is lenient: values
//! are coerced to integers and entries that coerce to 0 or below are
//! dropped (see [`Cart::deserialize`] notes on each rule).

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::catalog::Catalog;
use crate::totals::Totals;

// =============================================================================
// Cart Line
// =============================================================================

/// One cart entry: a product id and its quantity.
///
/// Quantity is `i64` like every count in this codebase; the `Cart`
/// invariant guarantees it is strictly positive for stored lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Product id (non-empty).
    pub id: String,

    /// Quantity (> 0 for any stored line).
    pub qty: i64,
}

// =============================================================================
// Cart
// =============================================================================

/// The cart: an ordered mapping from product id to quantity.
///
/// Backed by a `Vec` of unique-by-id lines so that iteration follows
/// insertion order without pulling in an ordered-map dependency.
/// Lookups are linear; carts are tiny.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns the quantity for `id`, or 0 when absent.
    pub fn qty(&self, id: &str) -> i64 {
        self.lines
            .iter()
            .find(|line| line.id == id)
            .map_or(0, |line| line.qty)
    }

    /// Checks whether `id` is present in the cart.
    pub fn contains(&self, id: &str) -> bool {
        self.lines.iter().any(|line| line.id == id)
    }

    /// Adds `delta` (which may be negative) to the quantity for `id`.
    ///
    /// ## Behavior
    /// - Empty id: no-op
    /// - Result is clamped at 0; a result of exactly 0 removes the entry
    /// - Missing entries start from 0, so `add(id, n)` inserts
    pub fn add(&mut self, id: &str, delta: i64) {
        if id.is_empty() {
            return;
        }
        let next = (self.qty(id) + delta).max(0);
        if next == 0 {
            self.remove(id);
        } else {
            self.upsert(id, next);
        }
    }

    /// Removes the entry for `id`.
    ///
    /// Returns whether the entry was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        self.lines.len() != before
    }

    /// Sets the quantity for `id` to exactly `qty` (absolute, unlike
    /// [`Cart::add`]).
    ///
    /// ## Behavior
    /// - Empty id: no-op
    /// - `qty` is clamped at 0; 0 removes the entry
    pub fn set_qty(&mut self, id: &str, qty: i64) {
        if id.is_empty() {
            return;
        }
        let q = qty.max(0);
        if q == 0 {
            self.remove(id);
        } else {
            self.upsert(id, q);
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Returns the total quantity across all entries.
    pub fn count(&self) -> i64 {
        self.lines.iter().map(|line| line.qty).sum()
    }

    /// Returns the cart entries in insertion order.
    pub fn items(&self) -> &[CartLine] {
        &self.lines
    }

    /// Computes subtotal/shipping/total against a product catalog.
    ///
    /// Products missing from the catalog contribute $0.00. Pure; the
    /// cart is not mutated.
    pub fn totals(&self, catalog: &Catalog) -> Totals {
        Totals::compute(self, catalog)
    }

    /// Inserts or updates a line, preserving insertion order.
    ///
    /// Callers must pass `qty > 0`; this is the only place lines are
    /// created.
    fn upsert(&mut self, id: &str, qty: i64) {
        debug_assert!(qty > 0);
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == id) {
            line.qty = qty;
        } else {
            self.lines.push(CartLine {
                id: id.to_string(),
                qty,
            });
        }
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

// =============================================================================
// Serde: the persisted JSON-object shape
// =============================================================================

/// Serializes as `{"<id>": <qty>, ...}` in insertion order.
impl Serialize for Cart {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.lines.len()))?;
        for line in &self.lines {
            map.serialize_entry(&line.id, &line.qty)?;
        }
        map.end()
    }
}

/// Coerces a JSON value to an integer quantity.
///
/// Mirrors the loose numeric coercion other consumers of the storage
/// key apply: numbers are rounded, numeric strings parsed, anything
/// else becomes 0.
fn coerce_qty(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or(0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(|f| f.round() as i64)
            .unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Lenient deserialization of the persisted object.
///
/// - Non-object documents are an error (the store layer treats that
///   as "no cart")
/// - Entries with empty ids, or whose value coerces to 0 or below,
///   are dropped so the cart invariant holds even against data some
///   other writer put under the key
/// - Duplicate keys: last one wins
impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CartVisitor;

        impl<'de> Visitor<'de> for CartVisitor {
            type Value = Cart;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of product ids to quantities")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Cart, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut cart = Cart::new();
                while let Some((id, value)) = access.next_entry::<String, Value>()? {
                    let qty = coerce_qty(&value);
                    // set_qty enforces the invariant: empty ids and
                    // qty <= 0 never land in the cart
                    if qty > 0 {
                        cart.set_qty(&id, qty);
                    } else {
                        cart.remove(&id);
                    }
                }
                Ok(cart)
            }
        }

        deserializer.deserialize_map(CartVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_inserts_and_accumulates() {
        let mut cart = Cart::new();
        cart.add("tee", 1);
        cart.add("tee", 2);

        assert_eq!(cart.qty("tee"), 3);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_add_negative_removes_at_zero() {
        let mut cart = Cart::new();
        cart.add("tee", 2);
        cart.add("tee", -2);

        assert!(!cart.contains("tee"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_clamps_below_zero() {
        let mut cart = Cart::new();
        cart.add("tee", 2);
        cart.add("tee", -5);

        // Clamped to 0, which removes the entry rather than storing 0
        assert!(!cart.contains("tee"));
    }

    #[test]
    fn test_add_then_subtract_restores_prior_state() {
        let mut cart = Cart::new();
        cart.add("jeans", 1);
        let before = cart.clone();

        cart.add("tee", 3);
        cart.add("tee", -3);

        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_empty_id_is_noop() {
        let mut cart = Cart::new();
        cart.add("", 5);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_qty_is_absolute() {
        let mut cart = Cart::new();
        cart.add("tee", 2);
        cart.set_qty("tee", 7);

        assert_eq!(cart.qty("tee"), 7);
    }

    #[test]
    fn test_set_qty_zero_equals_remove() {
        let mut a = Cart::new();
        let mut b = Cart::new();
        a.add("tee", 2);
        b.add("tee", 2);

        a.set_qty("tee", 0);
        b.remove("tee");

        assert_eq!(a, b);
    }

    #[test]
    fn test_set_qty_clamps_negative() {
        let mut cart = Cart::new();
        cart.add("tee", 2);
        cart.set_qty("tee", -4);

        assert!(!cart.contains("tee"));
    }

    #[test]
    fn test_remove_reports_presence() {
        let mut cart = Cart::new();
        cart.add("tee", 1);

        assert!(cart.remove("tee"));
        assert!(!cart.remove("tee"));
    }

    #[test]
    fn test_count_equals_sum_of_items() {
        let mut cart = Cart::new();
        cart.add("tee", 2);
        cart.add("jeans", 3);
        cart.add("cap", 1);

        let summed: i64 = cart.items().iter().map(|line| line.qty).sum();
        assert_eq!(cart.count(), summed);
        assert_eq!(cart.count(), 6);
    }

    #[test]
    fn test_no_entry_is_ever_nonpositive() {
        let mut cart = Cart::new();
        // Arbitrary mutation sequence mixing all three write ops
        cart.add("a", 3);
        cart.add("b", -1);
        cart.set_qty("c", 2);
        cart.add("a", -10);
        cart.set_qty("c", -5);
        cart.add("d", 0);
        cart.remove("b");
        cart.add("b", 1);

        for line in cart.items() {
            assert!(line.qty > 0, "entry {} has qty {}", line.id, line.qty);
        }
    }

    #[test]
    fn test_items_preserve_insertion_order() {
        let mut cart = Cart::new();
        cart.add("b", 1);
        cart.add("a", 1);
        cart.add("c", 1);
        cart.add("a", 1); // update must not reorder

        let ids: Vec<&str> = cart.items().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_serialize_as_json_object() {
        let mut cart = Cart::new();
        cart.add("tee", 2);
        cart.add("jeans", 1);

        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(json, r#"{"tee":2,"jeans":1}"#);
    }

    #[test]
    fn test_deserialize_roundtrip() {
        let mut cart = Cart::new();
        cart.add("tee", 2);
        cart.add("jeans", 1);

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_deserialize_coerces_loose_values() {
        let cart: Cart = serde_json::from_str(
            r#"{"a": 2, "b": "3", "c": 1.6, "d": null, "e": -4, "f": "junk", "": 9}"#,
        )
        .unwrap();

        assert_eq!(cart.qty("a"), 2);
        assert_eq!(cart.qty("b"), 3); // numeric string parsed
        assert_eq!(cart.qty("c"), 2); // rounded
        assert!(!cart.contains("d")); // null -> 0 -> dropped
        assert!(!cart.contains("e")); // negative dropped
        assert!(!cart.contains("f")); // non-numeric -> 0 -> dropped
        assert!(!cart.contains("")); // empty id dropped
    }

    #[test]
    fn test_deserialize_rejects_non_object() {
        assert!(serde_json::from_str::<Cart>("[1,2,3]").is_err());
        assert!(serde_json::from_str::<Cart>("42").is_err());
        assert!(serde_json::from_str::<Cart>("not json at all").is_err());
    }
}
