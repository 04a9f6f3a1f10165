//! Handler for `GET /states/{id}/cities`.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use terra_core::{geo::City, query::CHILDREN_DEFAULT_LIMIT, store::GeoStore};

use crate::{ApiState, ListParams, Paged, error::ApiError};

/// `GET /states/{id}/cities[?search=...][&limit=...][&offset=...]`
pub async fn cities<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  Query(params): Query<ListParams>,
) -> Result<Json<Paged<City>>, ApiError>
where
  S: GeoStore,
{
  let query = params.into_query(CHILDREN_DEFAULT_LIMIT, &state.options);
  let cities = state
    .store
    .list_state_cities(&id, &query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Paged::new(cities, query.pagination)))
}
