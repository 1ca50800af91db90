//! Transient filter state for the product grid.

use serde::{Deserialize, Serialize};

/// Category and free-text search currently applied to the catalog.
///
/// Never persisted; a fresh process starts from [`FilterState::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search_term: String,
}

impl FilterState {
    pub fn new(category: Option<String>, search_term: impl Into<String>) -> Self {
        Self {
            category,
            search_term: search_term.into(),
        }
    }

    /// The active category, treating an empty string as "all categories".
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category.filter(|c| !c.is_empty());
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
