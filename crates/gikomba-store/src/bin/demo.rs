//! # Store Walkthrough
//!
//! Exercises the full CartStore surface against an in-memory backend.
//!
//! ## Usage
//! ```bash
//! cargo run -p gikomba-store --features demo --bin demo
//!
//! # With debug logging for every store operation
//! RUST_LOG=debug cargo run -p gikomba-store --features demo --bin demo
//! ```
//!
//! Prints the badge as it updates, the final receipt, and saves a copy
//! as `receipt.txt` in the current directory.

use std::sync::Arc;

use gikomba_core::{Catalog, Money, ReceiptOptions};
use gikomba_store::{CartStore, FileSink, MemoryBackend, TextBadge};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut catalog = Catalog::new();
    catalog.insert("tee-01", "Vintage Band Tee", Money::from_cents(1000));
    catalog.insert("jkt-03", "Denim Jacket", Money::from_cents(2450));
    catalog.insert("cap-07", "Corduroy Cap", Money::from_cents(650));

    let store = CartStore::builder(Arc::new(MemoryBackend::new()))
        .sink(Arc::new(FileSink::new(".")))
        .build();

    let badge = Arc::new(TextBadge::new());
    store.auto_badge(badge.clone());

    store.add("tee-01", 2);
    println!("badge after adding 2 tees: {}", badge.text());

    store.add("jkt-03", 1);
    store.add("cap-07", 3);
    store.set_qty("cap-07", 1);
    store.add("jkt-03", -1); // negative add removes the jacket
    println!("badge after adjustments:  {}", badge.text());

    let totals = store.totals(&catalog);
    println!(
        "subtotal {}  shipping {}  total {}",
        totals.subtotal, totals.shipping, totals.total
    );

    println!("\n{}\n", store.receipt_text(&catalog, &ReceiptOptions::default()));

    store.download_receipt(&catalog, None);
    println!("receipt saved to ./receipt.txt");
}
