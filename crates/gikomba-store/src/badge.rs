//! # Badge Targets
//!
//! The "UI element" the cart count is rendered into, as a trait. The
//! store only ever calls `set_text`; what that means (a DOM node, a
//! terminal cell, a label widget) is the frontend's business.

use std::sync::Mutex;

/// Something that can display the cart count as text.
pub trait BadgeTarget: Send + Sync {
    /// Replaces the displayed text.
    fn set_text(&self, text: &str);
}

/// A plain text badge: mutex-guarded string.
///
/// The concrete target for tests and headless frontends.
#[derive(Debug, Default)]
pub struct TextBadge {
    text: Mutex<String>,
}

impl TextBadge {
    /// Creates an empty badge.
    pub fn new() -> Self {
        TextBadge::default()
    }

    /// Returns the currently displayed text.
    pub fn text(&self) -> String {
        self.text.lock().expect("badge mutex poisoned").clone()
    }
}

impl BadgeTarget for TextBadge {
    fn set_text(&self, text: &str) {
        *self.text.lock().expect("badge mutex poisoned") = text.to_string();
    }
}
