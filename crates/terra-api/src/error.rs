//! Handler errors and their JSON rendering.
//!
//! Every failure leaves the API as `{ "error": "<message>" }` with a status
//! chosen by [`ApiError::status`].

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

type BoxedStoreError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ApiError {
  /// No row for the requested key, or no such route.
  #[error("{0}")]
  NotFound(String),

  /// Rejected request parameters, e.g. a search text that is too short.
  #[error(transparent)]
  Invalid(#[from] terra_core::Error),

  /// The backing store failed; reported as-is with a 500.
  #[error(transparent)]
  Store(BoxedStoreError),
}

impl ApiError {
  /// Wrap any backend error; usable directly in `map_err`.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

#[derive(Serialize)]
struct ErrorBody {
  error: String,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if let ApiError::Store(e) = &self {
      tracing::error!(error = %e, "store query failed");
    }
    (status, Json(ErrorBody { error: self.to_string() })).into_response()
  }
}
