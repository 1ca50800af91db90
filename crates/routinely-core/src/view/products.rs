//! Product grid rendering.

use std::collections::BTreeSet;

use routinely_types::product::Product;
use serde::{Deserialize, Serialize};

use crate::selection::Selection;

/// Message shown when the filtered list is empty.
pub const NO_PRODUCTS_MESSAGE: &str = "No products match your filters.";

/// Message shown when the catalog could not be loaded at all.
pub const CATALOG_UNAVAILABLE_MESSAGE: &str = "Could not load products. Please try again later.";

/// One card in the product grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCard {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub image: String,
    pub description: String,
    /// Highlighted because the product is in the selection.
    pub selected: bool,
    /// The description panel is open.
    pub description_expanded: bool,
}

/// The rendered grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductGrid {
    /// Nothing to show for the current filter.
    Empty { message: String },
    /// The catalog failed to load; distinct from an empty filter result.
    Unavailable { message: String },
    Cards { cards: Vec<ProductCard> },
}

impl ProductGrid {
    pub fn cards(&self) -> &[ProductCard] {
        match self {
            ProductGrid::Empty { .. } | ProductGrid::Unavailable { .. } => &[],
            ProductGrid::Cards { cards } => cards,
        }
    }
}

/// Which cards have their description panel open.
///
/// Transient UI state, keyed by product name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionPanels {
    expanded: BTreeSet<String>,
}

impl DescriptionPanels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expand(&mut self, name: &str) {
        self.expanded.insert(name.to_string());
    }

    pub fn collapse(&mut self, name: &str) {
        self.expanded.remove(name);
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.contains(name)
    }
}

/// The grid shown in place of products when the catalog failed to load.
pub fn render_unavailable() -> ProductGrid {
    ProductGrid::Unavailable {
        message: CATALOG_UNAVAILABLE_MESSAGE.to_string(),
    }
}

/// Render the grid with every description panel collapsed.
pub fn render_products(filtered: &[&Product], selection: &Selection) -> ProductGrid {
    render_products_with_panels(filtered, selection, &DescriptionPanels::default())
}

/// Render the grid, opening the description panels listed in `panels`.
pub fn render_products_with_panels(
    filtered: &[&Product],
    selection: &Selection,
    panels: &DescriptionPanels,
) -> ProductGrid {
    if filtered.is_empty() {
        return ProductGrid::Empty {
            message: NO_PRODUCTS_MESSAGE.to_string(),
        };
    }

    let cards = filtered
        .iter()
        .map(|p| ProductCard {
            name: p.name.clone(),
            brand: p.brand.clone(),
            category: p.category.clone(),
            image: p.image.clone(),
            description: p.description.clone(),
            selected: selection.contains(&p.name),
            description_expanded: panels.is_expanded(&p.name),
        })
        .collect();

    ProductGrid::Cards { cards }
}
