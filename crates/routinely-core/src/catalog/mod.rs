//! Product catalog loading and lookup.
//!
//! `CatalogSource` is the port the infra layer implements (HTTP or file);
//! `CatalogStore` holds the most recently loaded snapshot.

pub mod source;
pub mod store;
