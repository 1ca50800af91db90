//! Product and catalog document types.
//!
//! A [`Product`] is identified by its `name`. Catalog files may carry extra
//! fields (ids, prices); they are ignored on load.

use serde::{Deserialize, Serialize};

/// A single purchasable item in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Display name, also the selection key.
    pub name: String,
    pub brand: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Image URL shown on the product card.
    #[serde(default)]
    pub image: String,
}

impl Product {
    /// Whether `term` (already lowercased) occurs in the name, brand, or description.
    pub fn matches_term(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term)
            || self.brand.to_lowercase().contains(term)
            || self.description.to_lowercase().contains(term)
    }

    /// One line of the routine prompt: `- name (brand) [category]: description`.
    pub fn prompt_line(&self) -> String {
        format!(
            "- {} ({}) [{}]: {}",
            self.name, self.brand, self.category, self.description
        )
    }
}

/// The catalog document as served by a catalog source: `{ "products": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub products: Vec<Product>,
}
