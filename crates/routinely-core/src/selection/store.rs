//! Selection store: the persisted side of [`Selection`].
//!
//! Every mutation is applied in memory first and then written through the
//! injected `KvStore`. A failed write is returned to the caller but the
//! in-memory change stands, so the views and storage only diverge until the
//! next successful mutation.

use routinely_types::error::StorageError;
use routinely_types::product::Product;
use tracing::{debug, warn};

use super::Selection;
use crate::storage::kv_store::KvStore;

/// Storage key holding the JSON-encoded selection.
pub const SELECTION_KEY: &str = "selectedProducts";

/// Owns the current selection and keeps durable storage in sync with it.
pub struct SelectionStore<K> {
    store: K,
    selection: Selection,
}

impl<K: KvStore> SelectionStore<K> {
    /// Create an empty store. Call [`restore`](Self::restore) to load saved state.
    pub fn new(store: K) -> Self {
        Self {
            store,
            selection: Selection::new(),
        }
    }

    /// Create a store and immediately restore the persisted selection.
    pub async fn open(store: K) -> Self {
        let mut this = Self::new(store);
        this.restore().await;
        this
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn contains(&self, name: &str) -> bool {
        self.selection.contains(name)
    }

    /// Access the underlying key-value store.
    pub fn store(&self) -> &K {
        &self.store
    }

    /// Load the persisted selection, replacing the in-memory one.
    ///
    /// Missing, unreadable, or unparsable data yields an empty selection.
    /// Returns the number of products restored.
    pub async fn restore(&mut self) -> usize {
        let raw = match self.store.get(SELECTION_KEY).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Failed to read persisted selection: {err}, starting empty");
                None
            }
        };

        self.selection = match raw {
            None => Selection::new(),
            Some(json) => match serde_json::from_str::<Vec<Product>>(&json) {
                Ok(products) => products.into_iter().collect(),
                Err(err) => {
                    warn!("Persisted selection is corrupt: {err}, starting empty");
                    Selection::new()
                }
            },
        };

        debug!(count = self.selection.len(), "restored selection");
        self.selection.len()
    }

    /// Write the current selection to durable storage.
    pub async fn persist(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.selection)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(SELECTION_KEY, &json).await
    }

    /// Flip membership of `product` and persist. Returns true if it is now selected.
    pub async fn toggle(&mut self, product: &Product) -> Result<bool, StorageError> {
        let selected = self.selection.toggle(product);
        debug!(product = %product.name, selected, "toggled selection");
        self.persist().await?;
        Ok(selected)
    }

    /// Remove a product by name (no-op if absent) and persist.
    pub async fn remove(&mut self, name: &str) -> Result<bool, StorageError> {
        let removed = self.selection.remove(name);
        debug!(product = %name, removed, "removed from selection");
        self.persist().await?;
        Ok(removed)
    }

    /// Empty the selection and persist.
    pub async fn clear(&mut self) -> Result<(), StorageError> {
        self.selection.clear();
        debug!("cleared selection");
        self.persist().await
    }
}
