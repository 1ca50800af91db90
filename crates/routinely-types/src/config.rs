//! Global configuration types for Routinely.
//!
//! `GlobalConfig` represents the `config.toml` in the data directory that
//! points the app at its catalog and chat endpoint.

use serde::{Deserialize, Serialize};

/// Top-level configuration. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Catalog location: an `http(s)://` URL or a filesystem path.
    #[serde(default = "default_catalog")]
    pub catalog: String,

    /// URL of the chat-completion endpoint (POST `{ messages, model }`).
    #[serde(default = "default_chat_endpoint")]
    pub chat_endpoint: String,

    /// Model identifier forwarded to the endpoint.
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound on a single chat request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Transcript length after which a warning is logged on each request.
    #[serde(default = "default_history_warn_threshold")]
    pub history_warn_threshold: usize,

    /// Optional bearer token for the chat endpoint.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_catalog() -> String {
    "products.json".to_string()
}

fn default_chat_endpoint() -> String {
    "http://127.0.0.1:8787/".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_history_warn_threshold() -> usize {
    40
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            chat_endpoint: default_chat_endpoint(),
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            history_warn_threshold: default_history_warn_threshold(),
            api_key: None,
        }
    }
}
