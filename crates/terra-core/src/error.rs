//! Error types for `terra-core`.

use thiserror::Error;

/// Input rejected before it reaches a store.
#[derive(Debug, Error)]
pub enum Error {
  #[error("search query must be at least {min} characters long")]
  QueryTooShort { min: usize },

  #[error("unknown search type {0:?}; expected one of: all, countries, states, cities")]
  UnknownSearchKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
