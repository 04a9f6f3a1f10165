//! Bulk loader: builds a fresh database file from the nested JSON dataset.
//!
//! The build happens in a staging file next to the target
//! (`<target>.building`). Only after every row is committed and the
//! connection is closed does the staging file replace the target, so a failed
//! build never leaves a half-populated database where a server would open it.

use std::{
  ffi::OsString,
  io,
  path::{Path, PathBuf},
};

use terra_core::source::{DatasetCounts, SourceCountry, parse_dataset};
use tracing::{debug, info};

use crate::{Error, Result, schema::build_schema};

/// Countries between two progress log lines.
const PROGRESS_EVERY: usize = 50;

/// Outcome of a successful [`build_database`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
  pub path:      PathBuf,
  pub counts:    DatasetCounts,
  /// Size of the finished database file, in bytes.
  pub file_size: u64,
}

impl BuildReport {
  pub fn size_mb(&self) -> f64 { self.file_size as f64 / (1024.0 * 1024.0) }
}

/// Read and parse the source dataset at `path`.
pub async fn read_dataset(path: &Path) -> Result<Vec<SourceCountry>> {
  let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
    if e.kind() == io::ErrorKind::NotFound {
      Error::SourceMissing(path.to_path_buf())
    } else {
      Error::Io { path: path.to_path_buf(), source: e }
    }
  })?;
  parse_dataset(&raw).map_err(|source| Error::Json { path: path.to_path_buf(), source })
}

/// Build the database at `target` from the dataset at `source`.
///
/// Replaces any existing file at `target` on success and leaves it untouched
/// on failure.
pub async fn build_database(source: &Path, target: &Path) -> Result<BuildReport> {
  info!(source = %source.display(), "reading source dataset");
  let countries = read_dataset(source).await?;

  let expected = DatasetCounts::of(&countries);
  info!(
    countries = expected.countries,
    states = expected.states,
    cities = expected.cities,
    "source dataset parsed"
  );

  let staging = sibling(target, ".building");
  remove_if_exists(&staging).await?;

  let inserted = match populate(&staging, countries).await {
    Ok(counts) => counts,
    Err(e) => {
      discard(&staging).await;
      return Err(e);
    }
  };
  if inserted != expected {
    discard(&staging).await;
    return Err(Error::CountMismatch { expected, inserted });
  }

  if let Err(e) = tokio::fs::rename(&staging, target).await {
    discard(&staging).await;
    return Err(Error::Io { path: target.to_path_buf(), source: e });
  }
  // WAL side files belong to the replaced database; they stay in place until
  // the rename has succeeded so a failed swap loses nothing.
  remove_if_exists(&sibling(target, "-wal")).await?;
  remove_if_exists(&sibling(target, "-shm")).await?;

  let file_size = tokio::fs::metadata(target)
    .await
    .map_err(|e| Error::Io { path: target.to_path_buf(), source: e })?
    .len();

  let report = BuildReport { path: target.to_path_buf(), counts: inserted, file_size };
  let size_mb = format!("{:.2}", report.size_mb());
  info!(
    countries = inserted.countries,
    states = inserted.states,
    cities = inserted.cities,
    size_mb = %size_mb,
    path = %target.display(),
    "database built"
  );
  Ok(report)
}

/// Create the schema in a new file at `path` and insert every row.
async fn populate(path: &Path, countries: Vec<SourceCountry>) -> Result<DatasetCounts> {
  let conn = tokio_rusqlite::Connection::open(path).await?;
  let counts = conn
    .call(move |conn| {
      build_schema(conn)?;
      Ok(insert_dataset(conn, &countries)?)
    })
    .await;
  // Close before the file is renamed or removed, even after a failure.
  conn.close().await?;
  counts.map_err(Error::from_call)
}

/// Insert `countries` with their states and cities inside one transaction.
///
/// Source ids are kept as primary keys and children take their parent's id
/// as foreign key, so countries are written before their states and states
/// before their cities. Any failure rolls the whole import back.
pub(crate) fn insert_dataset(
  conn: &mut rusqlite::Connection,
  countries: &[SourceCountry],
) -> rusqlite::Result<DatasetCounts> {
  let tx = conn.transaction()?;
  let mut counts = DatasetCounts::default();
  {
    let mut insert_country = tx.prepare_cached(
      "INSERT INTO countries (
         id, name, iso3, iso2, numeric_code, phonecode, capital, currency,
         currency_name, currency_symbol, tld, native, region, subregion,
         nationality, emoji, emojiU
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
    )?;
    let mut insert_state = tx.prepare_cached(
      "INSERT INTO states (
         id, country_id, name, iso2, iso3166_2, latitude, longitude, type, timezone
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    let mut insert_city = tx.prepare_cached(
      "INSERT INTO cities (id, state_id, name, latitude, longitude, timezone)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;

    for (index, country) in countries.iter().enumerate() {
      if index % PROGRESS_EVERY == 0 {
        debug!("inserting country {}/{}", index + 1, countries.len());
      }

      insert_country.execute(rusqlite::params![
        country.id,
        country.name,
        country.iso3,
        country.iso2,
        country.numeric_code,
        country.phonecode,
        country.capital,
        country.currency,
        country.currency_name,
        country.currency_symbol,
        country.tld,
        country.native,
        country.region,
        country.subregion,
        country.nationality,
        country.emoji,
        country.emoji_u,
      ])?;
      counts.countries += 1;

      for state in &country.states {
        insert_state.execute(rusqlite::params![
          state.id,
          country.id,
          state.name,
          state.iso2,
          state.iso3166_2,
          state.latitude,
          state.longitude,
          state.kind,
          state.timezone,
        ])?;
        counts.states += 1;

        for city in &state.cities {
          insert_city.execute(rusqlite::params![
            city.id,
            state.id,
            city.name,
            city.latitude,
            city.longitude,
            city.timezone,
          ])?;
          counts.cities += 1;
        }
      }
    }
  }
  tx.commit()?;
  Ok(counts)
}

/// `path` with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
  let mut name = OsString::from(path.as_os_str());
  name.push(suffix);
  PathBuf::from(name)
}

async fn remove_if_exists(path: &Path) -> Result<()> {
  match tokio::fs::remove_file(path).await {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(Error::Io { path: path.to_path_buf(), source: e }),
  }
}

/// Best-effort removal of a failed staging file.
async fn discard(path: &Path) {
  if let Err(e) = remove_if_exists(path).await {
    tracing::warn!(path = %path.display(), error = %e, "failed to remove staging database");
  }
}
