//! The user's chosen products and their persistence.
//!
//! [`Selection`] is the in-memory ordered set; [`store::SelectionStore`]
//! pairs it with a `KvStore` and persists after every mutation.

pub mod store;

use routinely_types::product::Product;
use serde::{Deserialize, Serialize};

/// Ordered set of products keyed by name.
///
/// Serializes as a plain JSON array of products, the persisted format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    items: Vec<Product>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|p| p.name == name)
    }

    /// Products in the order they were selected.
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Flip membership of `product`. Returns true if it is now selected.
    pub fn toggle(&mut self, product: &Product) -> bool {
        match self.items.iter().position(|p| p.name == product.name) {
            Some(index) => {
                self.items.remove(index);
                false
            }
            None => {
                self.items.push(product.clone());
                true
            }
        }
    }

    /// Remove by name. Returns true if something was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|p| p.name != name);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl FromIterator<Product> for Selection {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for product in iter {
            if !selection.contains(&product.name) {
                selection.items.push(product);
            }
        }
        selection
    }
}
