//! Key-value store trait.
//!
//! Values are opaque strings (JSON text in practice), the same contract as
//! browser local storage. Callers own serialization, which lets them tell
//! "absent" apart from "present but unparsable".

use routinely_types::error::StorageError;

/// Trait for durable string-keyed storage.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in routinely-infra, plus [`super::memory::InMemoryKvStore`].
pub trait KvStore: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Delete a key. No-op if key does not exist.
    fn delete(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;
}
