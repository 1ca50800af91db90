//! Global configuration loader for Routinely.
//!
//! Reads `config.toml` from the data directory and deserializes it into
//! [`GlobalConfig`]. Falls back to defaults when the file is missing or
//! malformed.

use std::path::Path;

use routinely_types::config::GlobalConfig;

use crate::filesystem::config_path;

/// Shortest request timeout honoured, in seconds.
const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`GlobalConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
/// - Otherwise the parsed config, with `request_timeout_secs` floored at 1.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let path = config_path(data_dir);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(mut config) => {
            config.request_timeout_secs = config.request_timeout_secs.max(MIN_REQUEST_TIMEOUT_SECS);
            config
        }
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            GlobalConfig::default()
        }
    }
}
