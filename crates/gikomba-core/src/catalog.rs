//! # Catalog Module
//!
//! The caller-supplied product reference: product-id → name + price.
//!
//! The catalog is **not owned or persisted** by this system. Callers
//! pass one into every totals/receipt computation, and lookups never
//! fail: a missing product prices at $0.00 and displays its raw id.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product as the cart needs to see it: display name and unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Display name used on receipts.
    pub name: String,

    /// Unit price in cents.
    pub price: Money,
}

impl Product {
    /// Creates a product.
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        Product {
            name: name.into(),
            price,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Mapping from product id to [`Product`].
///
/// `#[serde(transparent)]` keeps the JSON shape natural:
/// `{"tee-01": {"name": "Vintage Tee", "price": 1000}, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: HashMap<String, Product>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Inserts or replaces a product.
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>, price: Money) {
        self.products.insert(id.into(), Product::new(name, price));
    }

    /// Looks up a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    /// Returns the unit price for `id`, defaulting to zero for unknown
    /// products.
    pub fn price_of(&self, id: &str) -> Money {
        self.get(id).map_or(Money::zero(), |p| p.price)
    }

    /// Returns the display name for `id`, falling back to the raw id
    /// for unknown products.
    pub fn name_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |p| p.name.as_str())
    }

    /// Returns the number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Checks if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups_default_for_unknown_ids() {
        let catalog = Catalog::new();
        assert_eq!(catalog.price_of("ghost"), Money::zero());
        assert_eq!(catalog.name_of("ghost"), "ghost");
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut catalog = Catalog::new();
        catalog.insert("tee-01", "Vintage Tee", Money::from_cents(1000));

        assert_eq!(catalog.price_of("tee-01"), Money::from_cents(1000));
        assert_eq!(catalog.name_of("tee-01"), "Vintage Tee");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_deserialize_from_natural_json() {
        let catalog: Catalog = serde_json::from_str(
            r#"{"tee-01": {"name": "Vintage Tee", "price": 1000}}"#,
        )
        .unwrap();

        assert_eq!(catalog.price_of("tee-01"), Money::from_cents(1000));
    }
}
