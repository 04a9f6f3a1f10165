//! The `GeoStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `terra-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  geo::{City, CityMatch, Country, CountryCity, State, StateMatch},
  query::{CountryKey, ListQuery},
};

/// Read-only access to the country → state → city hierarchy.
///
/// Free text only ever reaches a backend as a bound substring pattern.
/// Listings are ordered by name; an unknown parent yields an empty list rather
/// than an error.
pub trait GeoStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Countries ─────────────────────────────────────────────────────────

  /// Countries whose `name` or `native` name contains `query.search`.
  fn list_countries<'a>(
    &'a self,
    query: &'a ListQuery,
  ) -> impl Future<Output = Result<Vec<Country>, Self::Error>> + Send + 'a;

  /// A single country by id or ISO code. Returns `None` if not found.
  fn get_country<'a>(
    &'a self,
    key: &'a CountryKey,
  ) -> impl Future<Output = Result<Option<Country>, Self::Error>> + Send + 'a;

  // ── Children ──────────────────────────────────────────────────────────

  /// States of the country matching `country_key` as id, iso2 or iso3.
  fn list_states<'a>(
    &'a self,
    country_key: &'a str,
    query: &'a ListQuery,
  ) -> impl Future<Output = Result<Vec<State>, Self::Error>> + Send + 'a;

  /// Cities of the state whose id equals `state_id`.
  fn list_state_cities<'a>(
    &'a self,
    state_id: &'a str,
    query: &'a ListQuery,
  ) -> impl Future<Output = Result<Vec<City>, Self::Error>> + Send + 'a;

  /// Cities of every state of the country matching `country_key`.
  fn list_country_cities<'a>(
    &'a self,
    country_key: &'a str,
    query: &'a ListQuery,
  ) -> impl Future<Output = Result<Vec<CountryCity>, Self::Error>> + Send + 'a;

  // ── Search ────────────────────────────────────────────────────────────

  fn search_countries<'a>(
    &'a self,
    text: &'a str,
    limit: i64,
  ) -> impl Future<Output = Result<Vec<Country>, Self::Error>> + Send + 'a;

  fn search_states<'a>(
    &'a self,
    text: &'a str,
    limit: i64,
  ) -> impl Future<Output = Result<Vec<StateMatch>, Self::Error>> + Send + 'a;

  fn search_cities<'a>(
    &'a self,
    text: &'a str,
    limit: i64,
  ) -> impl Future<Output = Result<Vec<CityMatch>, Self::Error>> + Send + 'a;
}
