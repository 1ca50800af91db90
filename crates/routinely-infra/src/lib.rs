//! Infrastructure layer for Routinely.
//!
//! Contains implementations of the port traits defined in `routinely-core`:
//! SQLite key-value storage, HTTP and file catalog sources, the HTTP chat
//! endpoint client, plus configuration loading and data-directory resolution.

pub mod catalog;
pub mod chat;
pub mod config;
pub mod filesystem;
pub mod sqlite;
