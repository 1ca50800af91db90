//! Catalog store holding the currently loaded products.

use routinely_types::error::CatalogError;
use routinely_types::product::Product;
use tracing::{info, warn};

use super::source::CatalogSource;

/// In-memory catalog snapshot backed by a [`CatalogSource`].
pub struct CatalogStore<S> {
    source: S,
    products: Vec<Product>,
    loaded: bool,
    last_error: Option<String>,
}

impl<S: CatalogSource> CatalogStore<S> {
    /// Create an empty store. Nothing is fetched until [`load`](Self::load).
    pub fn new(source: S) -> Self {
        Self {
            source,
            products: Vec::new(),
            loaded: false,
            last_error: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the catalog and replace the held snapshot.
    ///
    /// On failure the previous snapshot (possibly empty) is kept.
    /// Returns the number of products loaded.
    pub async fn load(&mut self) -> Result<usize, CatalogError> {
        match self.source.fetch().await {
            Ok(doc) => {
                self.products = doc.products;
                self.loaded = true;
                self.last_error = None;
                info!(
                    location = %self.source.location(),
                    count = self.products.len(),
                    "loaded catalog"
                );
                Ok(self.products.len())
            }
            Err(err) => {
                warn!(location = %self.source.location(), "catalog load failed: {err}");
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// The failure of the latest load, while no load has ever succeeded.
    ///
    /// Once a catalog has been loaded, later failures keep the prior snapshot
    /// on display and this stays `None`.
    pub fn unavailable(&self) -> Option<&str> {
        if self.loaded {
            None
        } else {
            self.last_error.as_deref()
        }
    }

    /// Products in catalog order; empty before the first successful load.
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(product.category.as_str());
            }
        }
        categories
    }
}
