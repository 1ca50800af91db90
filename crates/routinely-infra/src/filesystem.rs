//! Data-directory layout for Routinely.
//!
//! The data directory holds `config.toml` and `routinely.db`.

use std::path::{Path, PathBuf};

/// Resolve the data directory.
///
/// Checks `ROUTINELY_DATA_DIR` first, then falls back to `~/.routinely`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ROUTINELY_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".routinely");
    }

    PathBuf::from(".routinely")
}

/// Create the data directory if it does not exist yet.
pub async fn ensure_data_dir(data_dir: &Path) -> Result<(), std::io::Error> {
    tokio::fs::create_dir_all(data_dir).await
}

/// Path of the global config file inside `data_dir`.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}
