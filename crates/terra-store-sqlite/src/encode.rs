//! Decoding helpers between SQLite rows and the domain row types, plus the
//! encoding of user text into `LIKE` patterns.
//!
//! Decoders look columns up by name, so a query only has to select (or alias)
//! the right column names; their order does not matter.

use rusqlite::Row;
use terra_core::geo::{City, CityMatch, Country, CountryCity, State, StateMatch};

/// Escape character used by every `LIKE ... ESCAPE` clause.
pub const LIKE_ESCAPE: char = '\\';

/// Wrap `text` as a literal substring pattern: `%`, `_` and the escape
/// character itself lose their wildcard meaning.
pub fn like_pattern(text: &str) -> String {
  let mut pattern = String::with_capacity(text.len() + 2);
  pattern.push('%');
  for ch in text.chars() {
    if matches!(ch, '%' | '_') || ch == LIKE_ESCAPE {
      pattern.push(LIKE_ESCAPE);
    }
    pattern.push(ch);
  }
  pattern.push('%');
  pattern
}

// ─── Column lists ────────────────────────────────────────────────────────────

/// Every `countries` column, for a table aliased `c`.
pub const COUNTRY_COLUMNS: &str = "c.id, c.name, c.iso3, c.iso2, c.numeric_code, c.phonecode,
  c.capital, c.currency, c.currency_name, c.currency_symbol, c.tld, c.native,
  c.region, c.subregion, c.nationality, c.emoji, c.emojiU, c.created_at";

/// Every `states` column, for a table aliased `s`.
pub const STATE_COLUMNS: &str =
  "s.id, s.country_id, s.name, s.iso2, s.iso3166_2, s.latitude, s.longitude, s.type, s.timezone";

/// Every `cities` column, for a table aliased `ci`.
pub const CITY_COLUMNS: &str =
  "ci.id, ci.state_id, ci.name, ci.latitude, ci.longitude, ci.timezone";

// ─── Row decoders ────────────────────────────────────────────────────────────

pub fn country_from_row(row: &Row<'_>) -> rusqlite::Result<Country> {
  Ok(Country {
    id:              row.get("id")?,
    name:            row.get("name")?,
    iso3:            row.get("iso3")?,
    iso2:            row.get("iso2")?,
    numeric_code:    row.get("numeric_code")?,
    phonecode:       row.get("phonecode")?,
    capital:         row.get("capital")?,
    currency:        row.get("currency")?,
    currency_name:   row.get("currency_name")?,
    currency_symbol: row.get("currency_symbol")?,
    tld:             row.get("tld")?,
    native:          row.get("native")?,
    region:          row.get("region")?,
    subregion:       row.get("subregion")?,
    nationality:     row.get("nationality")?,
    emoji:           row.get("emoji")?,
    emoji_u:         row.get("emojiU")?,
    created_at:      row.get("created_at")?,
  })
}

pub fn state_from_row(row: &Row<'_>) -> rusqlite::Result<State> {
  Ok(State {
    id:         row.get("id")?,
    country_id: row.get("country_id")?,
    name:       row.get("name")?,
    iso2:       row.get("iso2")?,
    iso3166_2:  row.get("iso3166_2")?,
    latitude:   row.get("latitude")?,
    longitude:  row.get("longitude")?,
    kind:       row.get("type")?,
    timezone:   row.get("timezone")?,
  })
}

pub fn city_from_row(row: &Row<'_>) -> rusqlite::Result<City> {
  Ok(City {
    id:        row.get("id")?,
    state_id:  row.get("state_id")?,
    name:      row.get("name")?,
    latitude:  row.get("latitude")?,
    longitude: row.get("longitude")?,
    timezone:  row.get("timezone")?,
  })
}

pub fn country_city_from_row(row: &Row<'_>) -> rusqlite::Result<CountryCity> {
  Ok(CountryCity {
    city:       city_from_row(row)?,
    state_name: row.get("state_name")?,
    state_iso2: row.get("state_iso2")?,
  })
}

pub fn state_match_from_row(row: &Row<'_>) -> rusqlite::Result<StateMatch> {
  Ok(StateMatch {
    state:        state_from_row(row)?,
    country_name: row.get("country_name")?,
    country_iso2: row.get("country_iso2")?,
  })
}

pub fn city_match_from_row(row: &Row<'_>) -> rusqlite::Result<CityMatch> {
  Ok(CityMatch {
    city:         city_from_row(row)?,
    state_name:   row.get("state_name")?,
    country_name: row.get("country_name")?,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plain_text_is_wrapped() {
    assert_eq!(like_pattern("Sa"), "%Sa%");
    assert_eq!(like_pattern("São Paulo"), "%São Paulo%");
  }

  #[test]
  fn wildcards_are_escaped() {
    assert_eq!(like_pattern("50%"), "%50\\%%");
    assert_eq!(like_pattern("a_b"), "%a\\_b%");
    assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
  }
}
