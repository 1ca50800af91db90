//! SQLite storage via sqlx.

pub mod kv;
pub mod pool;
