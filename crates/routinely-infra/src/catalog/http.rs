//! Catalog fetched over HTTP.

use std::time::Duration;

use routinely_core::catalog::source::CatalogSource;
use routinely_types::error::CatalogError;
use routinely_types::product::CatalogDocument;

use super::parse_document;

/// GETs the catalog document from a URL on every fetch.
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: &str) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| CatalogError::Unavailable(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl CatalogSource for HttpCatalogSource {
    fn location(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<CatalogDocument, CatalogError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Unavailable(format!("HTTP {status} from {}", self.url)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Unavailable(format!("failed to read body: {e}")))?;
        parse_document(&body, &self.url)
    }
}
