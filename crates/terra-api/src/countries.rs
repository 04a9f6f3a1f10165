//! Handlers for `/countries` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/countries` | Optional `search`, `limit` (50), `offset` |
//! | `GET`  | `/countries/{id}` | Numeric id, ISO2 or ISO3; 404 if not found |
//! | `GET`  | `/countries/{id}/states` | Optional `search`, `limit` (100), `offset` |
//! | `GET`  | `/countries/{id}/cities` | Every city of every state; annotated with the state |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use terra_core::{
  geo::{Country, CountryCity, State as GeoState},
  query::{CHILDREN_DEFAULT_LIMIT, COUNTRIES_DEFAULT_LIMIT, CountryKey},
  store::GeoStore,
};

use crate::{ApiState, ListParams, Paged, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /countries[?search=...][&limit=...][&offset=...]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Paged<Country>>, ApiError>
where
  S: GeoStore,
{
  let query = params.into_query(COUNTRIES_DEFAULT_LIMIT, &state.options);
  let countries = state
    .store
    .list_countries(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Paged::new(countries, query.pagination)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /countries/{id}` — `id` is a numeric id or an ISO code in any case.
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Country>, ApiError>
where
  S: GeoStore,
{
  let key = CountryKey::parse(&id);
  let country = state
    .store
    .get_country(&key)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("country {id} not found")))?;
  Ok(Json(country))
}

// ─── Children ─────────────────────────────────────────────────────────────────

/// `GET /countries/{id}/states` — an unknown country yields an empty page.
pub async fn states<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  Query(params): Query<ListParams>,
) -> Result<Json<Paged<GeoState>>, ApiError>
where
  S: GeoStore,
{
  let query = params.into_query(CHILDREN_DEFAULT_LIMIT, &state.options);
  let states = state
    .store
    .list_states(&id, &query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Paged::new(states, query.pagination)))
}

/// `GET /countries/{id}/cities`
pub async fn cities<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  Query(params): Query<ListParams>,
) -> Result<Json<Paged<CountryCity>>, ApiError>
where
  S: GeoStore,
{
  let query = params.into_query(CHILDREN_DEFAULT_LIMIT, &state.options);
  let cities = state
    .store
    .list_country_cities(&id, &query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(Paged::new(cities, query.pagination)))
}
