//! Chat endpoint client implementations.

pub mod http;

pub use http::{HttpChatConfig, HttpChatProvider};
