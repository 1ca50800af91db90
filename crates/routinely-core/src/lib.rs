//! Business logic and port trait definitions for Routinely.
//!
//! This crate defines the "ports" (`KvStore`, `CatalogSource`, `ChatProvider`)
//! that the infrastructure layer implements, plus the stores, filter, view
//! renderer and chat session built on top of them. It depends only on
//! `routinely-types` -- never on `routinely-infra` or any database/HTTP crate,
//! so everything here runs headless in tests.

pub mod catalog;
pub mod chat;
pub mod filter;
pub mod selection;
pub mod storage;
pub mod view;
