//! SQLite backend for the Terra geographic reference store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The [`loader`] module builds a fresh
//! database file from the nested JSON source dataset.

mod encode;
mod schema;
mod store;

pub mod error;
pub mod loader;

pub use error::{Error, Result};
pub use loader::{BuildReport, build_database};
pub use store::SqliteStore;
