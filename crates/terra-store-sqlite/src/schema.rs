//! SQL schema for the Terra SQLite store.
//!
//! The same DDL serves two callers. A serving store runs it guarded with
//! `IF NOT EXISTS` on every open; the bulk loader runs it unguarded against a
//! brand-new file, where any existing object means the build environment is
//! broken and must fail loudly.

/// Tables and indexes. `{guard}` is substituted per mode.
const DDL: &str = "
CREATE TABLE {guard} countries (
    id              INTEGER PRIMARY KEY,  -- source-assigned, never generated
    name            TEXT NOT NULL,
    iso3            TEXT,
    iso2            TEXT,
    numeric_code    TEXT,
    phonecode       TEXT,
    capital         TEXT,
    currency        TEXT,
    currency_name   TEXT,
    currency_symbol TEXT,
    tld             TEXT,
    native          TEXT,
    region          TEXT,
    subregion       TEXT,
    nationality     TEXT,
    emoji           TEXT,
    emojiU          TEXT,
    created_at      DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE {guard} states (
    id          INTEGER PRIMARY KEY,
    country_id  INTEGER NOT NULL REFERENCES countries(id),
    name        TEXT NOT NULL,
    iso2        TEXT,
    iso3166_2   TEXT,
    latitude    TEXT,   -- decimal kept as source text
    longitude   TEXT,
    type        TEXT,   -- 'state' | 'province' | 'region' | ...
    timezone    TEXT
);

CREATE TABLE {guard} cities (
    id          INTEGER PRIMARY KEY,
    state_id    INTEGER NOT NULL REFERENCES states(id),
    name        TEXT NOT NULL,
    latitude    TEXT,
    longitude   TEXT,
    timezone    TEXT
);

CREATE INDEX {guard} idx_countries_name    ON countries(name);
CREATE INDEX {guard} idx_countries_iso2    ON countries(iso2);
CREATE INDEX {guard} idx_states_country_id ON states(country_id);
CREATE INDEX {guard} idx_states_name       ON states(name);
CREATE INDEX {guard} idx_cities_state_id   ON cities(state_id);
CREATE INDEX {guard} idx_cities_name       ON cities(name);
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaMode {
  /// Create whatever is missing; safe to repeat.
  Ensure,
  /// Create everything; fails if anything already exists.
  Build,
}

impl SchemaMode {
  pub fn sql(self) -> String {
    let (pragmas, guard) = match self {
      SchemaMode::Ensure => ("PRAGMA journal_mode = WAL;\nPRAGMA foreign_keys = ON;\n", "IF NOT EXISTS"),
      SchemaMode::Build => ("PRAGMA foreign_keys = ON;\n", ""),
    };
    format!("{pragmas}{}", DDL.replace("{guard}", guard))
  }
}

/// Idempotent schema setup for a serving store.
pub fn ensure_schema(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.execute_batch(&SchemaMode::Ensure.sql())
}

/// Unguarded schema setup for a freshly created database file.
pub fn build_schema(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.execute_batch(&SchemaMode::Build.sql())
}

#[cfg(test)]
mod tests {
  use super::*;

  const INDEXES: [&str; 6] = [
    "idx_countries_name",
    "idx_countries_iso2",
    "idx_states_country_id",
    "idx_states_name",
    "idx_cities_state_id",
    "idx_cities_name",
  ];

  fn index_names(conn: &rusqlite::Connection) -> Vec<String> {
    let mut stmt = conn
      .prepare("SELECT name FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%' ORDER BY name")
      .unwrap();
    stmt
      .query_map([], |r| r.get(0))
      .unwrap()
      .collect::<rusqlite::Result<Vec<String>>>()
      .unwrap()
  }

  #[test]
  fn ensure_is_repeatable() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    ensure_schema(&conn).unwrap();
    ensure_schema(&conn).unwrap();

    let mut expected: Vec<String> = INDEXES.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(index_names(&conn), expected);
  }

  #[test]
  fn build_fails_on_existing_schema() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    build_schema(&conn).unwrap();
    assert_eq!(index_names(&conn).len(), INDEXES.len());
    assert!(build_schema(&conn).is_err());
  }

  #[test]
  fn foreign_keys_are_enforced() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    ensure_schema(&conn).unwrap();
    let orphan = conn.execute(
      "INSERT INTO states (id, country_id, name) VALUES (1, 999, 'Nowhere')",
      [],
    );
    assert!(orphan.is_err());
  }
}
