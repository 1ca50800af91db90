//! Selection list rendering.

use serde::{Deserialize, Serialize};

use crate::selection::Selection;

/// Placeholder shown when nothing is selected.
pub const NO_SELECTION_MESSAGE: &str = "No products selected.";

/// One row of the selection list, with its remove control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionItem {
    pub name: String,
    pub brand: String,
    /// `name (brand)`
    pub label: String,
}

/// The rendered selection list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionView {
    /// Nothing selected yet. Distinct from an empty `Items` list.
    Placeholder { message: String },
    /// Selected products in selection order; the list carries a "clear all" control.
    Items { items: Vec<SelectionItem> },
}

pub fn render_selection(selection: &Selection) -> SelectionView {
    if selection.is_empty() {
        return SelectionView::Placeholder {
            message: NO_SELECTION_MESSAGE.to_string(),
        };
    }

    SelectionView::Items {
        items: selection
            .items()
            .iter()
            .map(|p| SelectionItem {
                name: p.name.clone(),
                brand: p.brand.clone(),
                label: format!("{} ({})", p.name, p.brand),
            })
            .collect(),
    }
}
