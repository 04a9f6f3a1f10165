//! JSON REST API for Terra.
//!
//! Exposes an axum [`Router`] backed by any [`terra_core::store::GeoStore`].
//! CORS, tracing, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = terra_api::router(store.clone(), ApiOptions::default());
//! // or, without the route catalog and fallback:
//! .nest("/api", terra_api::api_router(store.clone(), options))
//! ```

pub mod countries;
pub mod error;
pub mod meta;
pub mod search;
pub mod states;

use std::sync::Arc;

use axum::{Router, routing::get};
use serde::{Deserialize, Serialize};
use terra_core::{
  query::{ListQuery, Pagination},
  store::GeoStore,
};

pub use error::ApiError;

// ─── Options & state ─────────────────────────────────────────────────────────

/// Tunables for the API layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiOptions {
  /// Upper bound for any `limit` parameter. `None` leaves page sizes
  /// unbounded.
  pub max_page_size: Option<i64>,
}

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:   Arc<S>,
  pub options: ApiOptions,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), options: self.options }
  }
}

// ─── Shared request / response shapes ────────────────────────────────────────

/// Query string accepted by every list endpoint. Values are kept as raw
/// strings so malformed numbers fall back to defaults instead of failing.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub search: Option<String>,
  pub limit:  Option<String>,
  pub offset: Option<String>,
}

impl ListParams {
  pub fn into_query(self, default_limit: i64, options: &ApiOptions) -> ListQuery {
    let pagination = Pagination::from_params(
      self.limit.as_deref(),
      self.offset.as_deref(),
      default_limit,
      options.max_page_size,
    );
    ListQuery::new(self.search, pagination)
  }
}

/// Envelope returned by every list endpoint.
///
/// `total` is the number of rows in *this page*, not the number of matching
/// rows overall.
#[derive(Debug, Serialize, Deserialize)]
pub struct Paged<T> {
  pub data:   Vec<T>,
  pub total:  usize,
  pub limit:  i64,
  pub offset: i64,
}

impl<T> Paged<T> {
  pub fn new(data: Vec<T>, pagination: Pagination) -> Self {
    Self {
      total: data.len(),
      data,
      limit: pagination.limit,
      offset: pagination.offset,
    }
  }
}

// ─── Routers ─────────────────────────────────────────────────────────────────

/// The `/api` routes for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, options: ApiOptions) -> Router<()>
where
  S: GeoStore + 'static,
{
  Router::new()
    // Countries
    .route("/countries", get(countries::list::<S>))
    .route("/countries/{id}", get(countries::get_one::<S>))
    .route("/countries/{id}/states", get(countries::states::<S>))
    .route("/countries/{id}/cities", get(countries::cities::<S>))
    // States
    .route("/states/{id}/cities", get(states::cities::<S>))
    // Search
    .route("/search", get(search::handler::<S>))
    // Meta
    .route("/health", get(meta::health))
    .with_state(ApiState { store, options })
}

/// The complete application: route catalog at `/`, the API under `/api`,
/// and a JSON 404 for everything else.
pub fn router<S>(store: Arc<S>, options: ApiOptions) -> Router<()>
where
  S: GeoStore + 'static,
{
  Router::new()
    .route("/", get(meta::catalog))
    .nest("/api", api_router(store, options))
    .fallback(meta::fallback)
}

// ─── Integration tests ────────────────────────────────────────────────────────
