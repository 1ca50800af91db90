//! Application state wiring all services together.
//!
//! AppState holds the concrete stores and chat session used by both the CLI
//! and the REST API. Core types are generic over their ports; AppState pins
//! them to the infra implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::SecretString;
use tokio::sync::{Mutex, RwLock};

use routinely_core::catalog::source::CatalogSource;
use routinely_core::catalog::store::CatalogStore;
use routinely_core::chat::session::ChatSession;
use routinely_core::selection::store::SelectionStore;
use routinely_infra::catalog::AnyCatalogSource;
use routinely_infra::chat::{HttpChatConfig, HttpChatProvider};
use routinely_infra::config::load_global_config;
use routinely_infra::filesystem::{ensure_data_dir, resolve_data_dir};
use routinely_infra::sqlite::kv::SqliteKvStore;
use routinely_infra::sqlite::pool::DatabasePool;
use routinely_types::chat::Message;
use routinely_types::config::GlobalConfig;

pub type ConcreteCatalogStore = CatalogStore<AnyCatalogSource>;
pub type ConcreteSelectionStore = SelectionStore<SqliteKvStore>;
pub type ConcreteChatSession = ChatSession<HttpChatProvider>;

/// Extra slack on the HTTP client so the session timeout fires first.
const TRANSPORT_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Command-line and environment overrides layered over `config.toml`.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub catalog: Option<String>,
    pub chat_endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(self, config: &mut GlobalConfig) {
        if let Some(catalog) = self.catalog {
            config.catalog = catalog;
        }
        if let Some(endpoint) = self.chat_endpoint {
            config.chat_endpoint = endpoint;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if self.api_key.is_some() {
            config.api_key = self.api_key;
        }
    }
}

/// Shared application state.
///
/// The catalog sits behind a `RwLock` (reads dominate, reload writes). The
/// selection and chat session sit behind `Mutex`es; the HTTP layer uses
/// `try_lock` on the session so a second chat request is rejected rather
/// than queued. `chat_transcript` mirrors the session's transcript as of
/// the last settled request, so it stays readable while one is in flight.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RwLock<ConcreteCatalogStore>>,
    pub selection: Arc<Mutex<ConcreteSelectionStore>>,
    pub chat: Arc<Mutex<ConcreteChatSession>>,
    pub chat_transcript: Arc<RwLock<Vec<Message>>>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve the data directory, load config, and wire everything.
    pub async fn init(overrides: ConfigOverrides) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let mut config = load_global_config(&data_dir).await;
        overrides.apply(&mut config);

        Self::with_config(&data_dir, config).await
    }

    /// Wire state for an explicit data directory and config.
    pub async fn with_config(data_dir: &Path, config: GlobalConfig) -> anyhow::Result<Self> {
        let pool = DatabasePool::open_in(data_dir)
            .await
            .with_context(|| format!("Failed to open database in {}", data_dir.display()))?;
        let selection = SelectionStore::open(SqliteKvStore::new(pool)).await;

        let source = AnyCatalogSource::from_location(&config.catalog)?;
        let catalog = CatalogStore::new(source);

        let request_timeout = Duration::from_secs(config.request_timeout_secs);
        let provider = HttpChatProvider::new(HttpChatConfig {
            endpoint: config.chat_endpoint.clone(),
            api_key: config.api_key.clone().map(SecretString::from),
            timeout: request_timeout + TRANSPORT_TIMEOUT_SLACK,
        })?;
        let chat = ChatSession::new(provider, config.model.clone())
            .with_request_timeout(request_timeout)
            .with_history_warn_threshold(config.history_warn_threshold);

        Ok(Self {
            catalog: Arc::new(RwLock::new(catalog)),
            selection: Arc::new(Mutex::new(selection)),
            chat: Arc::new(Mutex::new(chat)),
            chat_transcript: Arc::new(RwLock::new(Vec::new())),
            config: Arc::new(config),
            data_dir: data_dir.to_path_buf(),
        })
    }

    /// Fetch the catalog, returning the product count.
    pub async fn load_catalog(&self) -> anyhow::Result<usize> {
        let mut catalog = self.catalog.write().await;
        let location = catalog.source().location().to_string();
        catalog
            .load()
            .await
            .with_context(|| format!("Failed to load catalog from {location}"))
    }
}
