//! Catalog source implementations.
//!
//! [`AnyCatalogSource::from_location`] picks HTTP for `http://`/`https://`
//! locations and the filesystem for everything else.

pub mod file;
pub mod http;

use routinely_core::catalog::source::CatalogSource;
use routinely_types::error::CatalogError;
use routinely_types::product::CatalogDocument;

use self::file::FileCatalogSource;
use self::http::HttpCatalogSource;

/// Runtime-selected catalog source.
pub enum AnyCatalogSource {
    Http(HttpCatalogSource),
    File(FileCatalogSource),
}

impl AnyCatalogSource {
    pub fn from_location(location: &str) -> Result<Self, CatalogError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            Ok(Self::Http(HttpCatalogSource::new(location)?))
        } else {
            Ok(Self::File(FileCatalogSource::new(location)))
        }
    }
}

impl CatalogSource for AnyCatalogSource {
    fn location(&self) -> &str {
        match self {
            Self::Http(source) => source.location(),
            Self::File(source) => source.location(),
        }
    }

    async fn fetch(&self) -> Result<CatalogDocument, CatalogError> {
        match self {
            Self::Http(source) => source.fetch().await,
            Self::File(source) => source.fetch().await,
        }
    }
}

/// Parse a catalog document, mapping any failure to `Unavailable`.
pub(crate) fn parse_document(body: &str, location: &str) -> Result<CatalogDocument, CatalogError> {
    serde_json::from_str(body)
        .map_err(|e| CatalogError::Unavailable(format!("invalid catalog at {location}: {e}")))
}
