//! [`SqliteStore`] — the SQLite implementation of [`GeoStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, Row, types::Value};

use terra_core::{
  geo::{City, CityMatch, Country, CountryCity, State, StateMatch},
  query::{CountryKey, ListQuery},
  source::{DatasetCounts, SourceCountry},
  store::GeoStore,
};

use crate::{
  Error, Result,
  encode::{
    CITY_COLUMNS, COUNTRY_COLUMNS, STATE_COLUMNS, city_from_row, city_match_from_row,
    country_city_from_row, country_from_row, like_pattern, state_from_row,
    state_match_from_row,
  },
  loader::insert_dataset,
  schema::ensure_schema,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A read-only geographic store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and make sure the schema exists.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        ensure_schema(conn)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a whole source tree in one transaction.
  ///
  /// Either every row lands or none does.
  pub async fn import(&self, countries: Vec<SourceCountry>) -> Result<DatasetCounts> {
    self
      .conn
      .call(move |conn| Ok(insert_dataset(conn, &countries)?))
      .await
      .map_err(Error::from_call)
  }

  /// Run `sql` with `params` and decode every row.
  async fn fetch<T>(
    &self,
    sql: String,
    params: Vec<Value>,
    decode: fn(&Row<'_>) -> rusqlite::Result<T>,
  ) -> Result<Vec<T>>
  where
    T: Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), decode)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}

/// Bind values shared by the listings that resolve a country by id, iso2 or
/// iso3: `?1` raw key, `?2` uppercased key, `?3` optional name pattern,
/// `?4` limit, `?5` offset.
fn country_scoped_params(country_key: &str, query: &ListQuery) -> Vec<Value> {
  vec![
    Value::from(country_key.to_owned()),
    Value::from(country_key.to_uppercase()),
    Value::from(query.search.as_deref().map(like_pattern)),
    Value::from(query.pagination.limit),
    Value::from(query.pagination.offset),
  ]
}

// ─── GeoStore impl ───────────────────────────────────────────────────────────

impl GeoStore for SqliteStore {
  type Error = crate::Error;

  // ── Countries ─────────────────────────────────────────────────────────────

  async fn list_countries(&self, query: &ListQuery) -> Result<Vec<Country>> {
    let sql = format!(
      "SELECT {COUNTRY_COLUMNS}
       FROM countries c
       WHERE ?1 IS NULL
          OR c.name   LIKE ?1 ESCAPE '\\'
          OR c.native LIKE ?1 ESCAPE '\\'
       ORDER BY c.name
       LIMIT ?2 OFFSET ?3"
    );
    let params = vec![
      Value::from(query.search.as_deref().map(like_pattern)),
      Value::from(query.pagination.limit),
      Value::from(query.pagination.offset),
    ];
    self.fetch(sql, params, country_from_row).await
  }

  async fn get_country(&self, key: &CountryKey) -> Result<Option<Country>> {
    let (filter, param) = match key {
      CountryKey::Id(id) => ("c.id = ?1", Value::from(*id)),
      CountryKey::Code(code) => ("c.iso2 = ?1 OR c.iso3 = ?1", Value::from(code.clone())),
    };
    let sql = format!(
      "SELECT {COUNTRY_COLUMNS} FROM countries c WHERE {filter} ORDER BY c.id LIMIT 1"
    );

    let country = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .prepare_cached(&sql)?
            .query_row([param], country_from_row)
            .optional()?,
        )
      })
      .await?;
    Ok(country)
  }

  // ── Children ──────────────────────────────────────────────────────────────

  async fn list_states(&self, country_key: &str, query: &ListQuery) -> Result<Vec<State>> {
    let sql = format!(
      "SELECT {STATE_COLUMNS}
       FROM states s
       JOIN countries c ON s.country_id = c.id
       WHERE (c.id = ?1 OR c.iso2 = ?2 OR c.iso3 = ?2)
         AND (?3 IS NULL OR s.name LIKE ?3 ESCAPE '\\')
       ORDER BY s.name
       LIMIT ?4 OFFSET ?5"
    );
    let params = country_scoped_params(country_key, query);
    self.fetch(sql, params, state_from_row).await
  }

  async fn list_state_cities(&self, state_id: &str, query: &ListQuery) -> Result<Vec<City>> {
    let sql = format!(
      "SELECT {CITY_COLUMNS}
       FROM cities ci
       JOIN states s ON ci.state_id = s.id
       WHERE s.id = ?1
         AND (?2 IS NULL OR ci.name LIKE ?2 ESCAPE '\\')
       ORDER BY ci.name
       LIMIT ?3 OFFSET ?4"
    );
    let params = vec![
      Value::from(state_id.to_owned()),
      Value::from(query.search.as_deref().map(like_pattern)),
      Value::from(query.pagination.limit),
      Value::from(query.pagination.offset),
    ];
    self.fetch(sql, params, city_from_row).await
  }

  async fn list_country_cities(
    &self,
    country_key: &str,
    query: &ListQuery,
  ) -> Result<Vec<CountryCity>> {
    let sql = format!(
      "SELECT {CITY_COLUMNS}, s.name AS state_name, s.iso2 AS state_iso2
       FROM cities ci
       JOIN states s    ON ci.state_id  = s.id
       JOIN countries c ON s.country_id = c.id
       WHERE (c.id = ?1 OR c.iso2 = ?2 OR c.iso3 = ?2)
         AND (?3 IS NULL OR ci.name LIKE ?3 ESCAPE '\\')
       ORDER BY ci.name
       LIMIT ?4 OFFSET ?5"
    );
    let params = country_scoped_params(country_key, query);
    self.fetch(sql, params, country_city_from_row).await
  }

  // ── Search ────────────────────────────────────────────────────────────────

  async fn search_countries(&self, text: &str, limit: i64) -> Result<Vec<Country>> {
    let sql = format!(
      "SELECT {COUNTRY_COLUMNS}
       FROM countries c
       WHERE c.name LIKE ?1 ESCAPE '\\' OR c.native LIKE ?1 ESCAPE '\\'
       ORDER BY c.name
       LIMIT ?2"
    );
    let params = vec![Value::from(like_pattern(text)), Value::from(limit)];
    self.fetch(sql, params, country_from_row).await
  }

  async fn search_states(&self, text: &str, limit: i64) -> Result<Vec<StateMatch>> {
    let sql = format!(
      "SELECT {STATE_COLUMNS}, c.name AS country_name, c.iso2 AS country_iso2
       FROM states s
       JOIN countries c ON s.country_id = c.id
       WHERE s.name LIKE ?1 ESCAPE '\\'
       ORDER BY s.name
       LIMIT ?2"
    );
    let params = vec![Value::from(like_pattern(text)), Value::from(limit)];
    self.fetch(sql, params, state_match_from_row).await
  }

  async fn search_cities(&self, text: &str, limit: i64) -> Result<Vec<CityMatch>> {
    let sql = format!(
      "SELECT {CITY_COLUMNS}, s.name AS state_name, c.name AS country_name
       FROM cities ci
       JOIN states s    ON ci.state_id  = s.id
       JOIN countries c ON s.country_id = c.id
       WHERE ci.name LIKE ?1 ESCAPE '\\'
       ORDER BY ci.name
       LIMIT ?2"
    );
    let params = vec![Value::from(like_pattern(text)), Value::from(limit)];
    self.fetch(sql, params, city_match_from_row).await
  }
}
