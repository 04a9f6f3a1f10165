//! Handler for `GET /search`.
//!
//! `q` must be at least two characters long. `type` narrows the search to one
//! of `countries`, `states` or `cities` (default `all`); `limit` applies to
//! each bucket separately.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use terra_core::{
  query::{Pagination, SEARCH_DEFAULT_LIMIT},
  search::{SearchRequest, SearchResults, fan_out},
  store::GeoStore,
};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  pub q:     Option<String>,
  #[serde(rename = "type")]
  pub kind:  Option<String>,
  pub limit: Option<String>,
}

/// `GET /search?q=...[&type=all|countries|states|cities][&limit=...]`
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, ApiError>
where
  S: GeoStore,
{
  let limit = Pagination::from_params(
    params.limit.as_deref(),
    None,
    SEARCH_DEFAULT_LIMIT,
    state.options.max_page_size,
  )
  .limit;
  let request = SearchRequest::new(params.q.as_deref(), params.kind.as_deref(), limit)?;

  let results = fan_out(state.store.as_ref(), &request)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(results))
}
