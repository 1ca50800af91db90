//! Shared domain types for Routinely.
//!
//! Products and catalogs, chat messages and the remote endpoint's wire
//! shapes, filter state, configuration, and the error enums used across
//! the workspace.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod filter;
pub mod product;
