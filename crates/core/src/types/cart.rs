//! Session shopping cart.
//!
//! The cart only records *what* the shopper wants and how many; prices are
//! never held here. They are looked up in the catalog whenever the cart is
//! rendered or checked out, so a cart can outlive price changes and even the
//! products it references.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// One cart line: a product and how many units of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Catalog product this line refers to (not validated on insert).
    pub product_id: ProductId,
    /// Number of units, always at least 1.
    pub quantity: u32,
}

/// A per-session cart, kept in insertion order.
///
/// Serialized as a list of entries so it can live in the session store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add one unit of a product, creating the line if absent.
    ///
    /// Returns the line's new quantity. Quantities saturate at `u32::MAX`.
    pub fn add(&mut self, product_id: ProductId) -> u32 {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.product_id == product_id)
        {
            entry.quantity = entry.quantity.saturating_add(1);
            return entry.quantity;
        }

        self.entries.push(CartEntry {
            product_id,
            quantity: 1,
        });
        1
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lines in the order products were first added.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Quantity of a product in the cart (0 if absent).
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.entries
            .iter()
            .find(|entry| entry.product_id == product_id)
            .map_or(0, |entry| entry.quantity)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.entries
            .iter()
            .fold(0_u32, |acc, entry| acc.saturating_add(entry.quantity))
    }
}
