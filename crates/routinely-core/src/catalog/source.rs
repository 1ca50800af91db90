//! CatalogSource trait definition.

use routinely_types::error::CatalogError;
use routinely_types::product::CatalogDocument;

/// Somewhere a catalog document can be fetched from.
///
/// Implementations must map unreachable sources and invalid documents to
/// [`CatalogError::Unavailable`]. Every call fetches fresh; caching is the
/// store's concern.
pub trait CatalogSource: Send + Sync {
    /// Human-readable location (URL or path) for logs and status output.
    fn location(&self) -> &str;

    /// Fetch and parse the catalog document.
    fn fetch(
        &self,
    ) -> impl std::future::Future<Output = Result<CatalogDocument, CatalogError>> + Send;
}
