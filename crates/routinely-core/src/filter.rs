//! Filter controller: category + free-text search over the catalog.
//!
//! Pure functions. Re-run after every change to the filter, the catalog, or
//! the selection (the grid's highlight depends on all three).

use routinely_types::filter::FilterState;
use routinely_types::product::Product;

/// Ordered subsequence of `catalog` matching the category and search term.
///
/// - An empty `category` matches every product; otherwise the match is exact.
/// - `search_term` is trimmed and compared case-insensitively against name,
///   brand, and description; an empty term matches every product.
pub fn apply<'a>(catalog: &'a [Product], category: &str, search_term: &str) -> Vec<&'a Product> {
    let term = search_term.trim().to_lowercase();
    catalog
        .iter()
        .filter(|p| category.is_empty() || p.category == category)
        .filter(|p| term.is_empty() || p.matches_term(&term))
        .collect()
}

/// [`apply`] driven by a [`FilterState`].
pub fn apply_state<'a>(catalog: &'a [Product], state: &FilterState) -> Vec<&'a Product> {
    apply(catalog, state.category(), &state.search_term)
}
