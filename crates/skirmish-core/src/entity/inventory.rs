//! Insertion-ordered item bag.

use serde::{Deserialize, Serialize};

use super::item::ItemKind;

/// Items carried by a player.
///
/// Keeps insertion order, allows duplicates, and removes by value (the first
/// equal item).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<ItemKind>,
}

impl Inventory {
    /// Create an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item.
    pub fn add(&mut self, item: ItemKind) {
        self.items.push(item);
    }

    /// True if an equal item is carried.
    #[must_use]
    pub fn contains(&self, item: &ItemKind) -> bool {
        self.items.contains(item)
    }

    /// Remove the first item equal to `item`.
    ///
    /// # Returns
    ///
    /// `false` if no equal item was carried.
    pub fn remove(&mut self, item: &ItemKind) -> bool {
        match self.items.iter().position(|carried| carried == item) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove and return the first item matching a predicate.
    pub fn take_first(&mut self, predicate: impl Fn(&ItemKind) -> bool) -> Option<ItemKind> {
        let index = self.items.iter().position(predicate)?;
        Some(self.items.remove(index))
    }

    /// Carried items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[ItemKind] {
        &self.items
    }

    /// Number of carried items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing is carried.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
