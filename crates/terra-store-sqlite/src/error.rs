//! Error type for `terra-store-sqlite`.

use std::path::PathBuf;

use terra_core::source::DatasetCounts;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A statement failed inside a connection call, e.g. a constraint
  /// violation while importing.
  #[error("sqlite error: {0}")]
  Sqlite(#[source] rusqlite::Error),

  #[error("i/o error on {path:?}: {source}")]
  Io {
    path:   PathBuf,
    source: std::io::Error,
  },

  /// The source dataset does not exist.
  #[error("source dataset not found: {0:?}")]
  SourceMissing(PathBuf),

  /// The source dataset is not a valid country tree.
  #[error("malformed source dataset {path:?}: {source}")]
  Json {
    path:   PathBuf,
    source: serde_json::Error,
  },

  #[error("inserted {inserted:?} rows but the source holds {expected:?}")]
  CountMismatch {
    expected: DatasetCounts,
    inserted: DatasetCounts,
  },
}

impl Error {
  /// Unwrap statement failures from a `Connection::call` result so they can
  /// be told apart from the connection itself going away.
  pub(crate) fn from_call(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Rusqlite(e) => Error::Sqlite(e),
      other => Error::Database(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
