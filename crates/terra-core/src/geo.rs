//! Row types served by the query layer.
//!
//! Field names mirror the column names of the relational store so that the
//! JSON returned by the API matches what a `SELECT *` would have produced.

use serde::{Deserialize, Serialize};

/// A country row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
  pub id:              i64,
  pub name:            String,
  pub iso3:            Option<String>,
  pub iso2:            Option<String>,
  pub numeric_code:    Option<String>,
  pub phonecode:       Option<String>,
  pub capital:         Option<String>,
  pub currency:        Option<String>,
  pub currency_name:   Option<String>,
  pub currency_symbol: Option<String>,
  pub tld:             Option<String>,
  pub native:          Option<String>,
  pub region:          Option<String>,
  pub subregion:       Option<String>,
  pub nationality:     Option<String>,
  pub emoji:           Option<String>,
  #[serde(rename = "emojiU")]
  pub emoji_u:         Option<String>,
  /// Set by the store when the row was built.
  pub created_at:      Option<String>,
}

/// An administrative subdivision (state, province, region...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
  pub id:         i64,
  pub country_id: i64,
  pub name:       String,
  pub iso2:       Option<String>,
  pub iso3166_2:  Option<String>,
  pub latitude:   Option<String>,
  pub longitude:  Option<String>,
  /// Free-text classification, e.g. `"province"`.
  #[serde(rename = "type")]
  pub kind:       Option<String>,
  pub timezone:   Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
  pub id:        i64,
  pub state_id:  i64,
  pub name:      String,
  pub latitude:  Option<String>,
  pub longitude: Option<String>,
  pub timezone:  Option<String>,
}

// ─── Annotated projections ───────────────────────────────────────────────────

/// A city listed under a country, annotated with its parent state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCity {
  #[serde(flatten)]
  pub city:       City,
  pub state_name: String,
  pub state_iso2: Option<String>,
}

/// A state returned by the fan-out search, annotated with its country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMatch {
  #[serde(flatten)]
  pub state:        State,
  pub country_name: String,
  pub country_iso2: Option<String>,
}

/// A city returned by the fan-out search, annotated with state and country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityMatch {
  #[serde(flatten)]
  pub city:         City,
  pub state_name:   String,
  pub country_name: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn city() -> City {
    City {
      id:        1,
      state_id:  7,
      name:      "Santos".into(),
      latitude:  Some("-23.96083000".into()),
      longitude: None,
      timezone:  None,
    }
  }

  #[test]
  fn annotated_city_serialises_flat() {
    let row = CountryCity {
      city:       city(),
      state_name: "São Paulo".into(),
      state_iso2: Some("SP".into()),
    };
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["name"], "Santos");
    assert_eq!(json["state_id"], 7);
    assert_eq!(json["state_name"], "São Paulo");
    assert_eq!(json["state_iso2"], "SP");
    assert!(json["longitude"].is_null());
  }

  #[test]
  fn state_kind_serialises_as_type() {
    let state = State {
      id:         2,
      country_id: 31,
      name:       "Bahia".into(),
      iso2:       Some("BA".into()),
      iso3166_2:  None,
      latitude:   None,
      longitude:  None,
      kind:       Some("state".into()),
      timezone:   None,
    };
    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["type"], "state");
    assert!(json.get("kind").is_none());
  }
}
