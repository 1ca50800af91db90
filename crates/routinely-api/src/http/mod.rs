//! HTTP/REST API layer for Routinely.
//!
//! Axum-based REST API at `/api/v1/` with an envelope response format and
//! CORS, so a thin browser front end can drive the same stores and chat
//! session as the CLI.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;
pub mod router;
