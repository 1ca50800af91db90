//! Durable storage abstractions for Routinely.
//!
//! Defines the key-value store trait the selection is persisted through.
//! The SQLite implementation lives in routinely-infra.

pub mod kv_store;
pub mod memory;
