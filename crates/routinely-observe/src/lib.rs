//! Observability for Routinely: structured logging with optional
//! OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{default_filter, init_tracing, shutdown_tracing};
