//! Catalog loaded from a JSON file on disk.

use std::path::PathBuf;

use routinely_core::catalog::source::CatalogSource;
use routinely_types::error::CatalogError;
use routinely_types::product::CatalogDocument;

use super::parse_document;

/// Reads `{ "products": [...] }` from a local file on every fetch.
pub struct FileCatalogSource {
    path: PathBuf,
    location: String,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let location = path.display().to_string();
        Self { path, location }
    }
}

impl CatalogSource for FileCatalogSource {
    fn location(&self) -> &str {
        &self.location
    }

    async fn fetch(&self) -> Result<CatalogDocument, CatalogError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CatalogError::Unavailable(format!("cannot read {}: {e}", self.location)))?;
        parse_document(&body, &self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_reads_products() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        tokio::fs::write(
            &path,
            r#"{"products":[{"id":7,"name":"Lip Balm","brand":"Burt's Bees","category":"lipcare","description":"Beeswax balm","image":"https://example.com/balm.jpg"}]}"#,
        )
        .await
        .unwrap();

        let doc = FileCatalogSource::new(&path).fetch().await.unwrap();
        assert_eq!(doc.products.len(), 1);
        assert_eq!(doc.products[0].brand, "Burt's Bees");
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileCatalogSource::new(dir.path().join("nope.json"))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_invalid_json_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        tokio::fs::write(&path, "<html>not json</html>").await.unwrap();

        let err = FileCatalogSource::new(&path).fetch().await.unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable(_)));
    }
}
