//! The nested source dataset the bulk loader imports.
//!
//! The dataset is a JSON array of countries, each embedding its states, each
//! embedding its cities. The upstream format has drifted over the years, so
//! deserialisation is lenient: unknown fields are ignored, missing or `null`
//! child arrays are treated as empty, and text columns that occasionally
//! arrive as JSON numbers are stored as their decimal text.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A country node of the source tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCountry {
  pub id:              i64,
  pub name:            String,
  #[serde(default)]
  pub iso3:            Option<String>,
  #[serde(default)]
  pub iso2:            Option<String>,
  #[serde(default, deserialize_with = "lenient_text")]
  pub numeric_code:    Option<String>,
  #[serde(default, alias = "phone_code", deserialize_with = "lenient_text")]
  pub phonecode:       Option<String>,
  #[serde(default)]
  pub capital:         Option<String>,
  #[serde(default)]
  pub currency:        Option<String>,
  #[serde(default)]
  pub currency_name:   Option<String>,
  #[serde(default)]
  pub currency_symbol: Option<String>,
  #[serde(default)]
  pub tld:             Option<String>,
  #[serde(default)]
  pub native:          Option<String>,
  #[serde(default)]
  pub region:          Option<String>,
  #[serde(default)]
  pub subregion:       Option<String>,
  #[serde(default)]
  pub nationality:     Option<String>,
  #[serde(default)]
  pub emoji:           Option<String>,
  #[serde(default, rename = "emojiU")]
  pub emoji_u:         Option<String>,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub states:          Vec<SourceState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceState {
  pub id:        i64,
  pub name:      String,
  #[serde(default, alias = "state_code")]
  pub iso2:      Option<String>,
  #[serde(default)]
  pub iso3166_2: Option<String>,
  #[serde(default, deserialize_with = "lenient_text")]
  pub latitude:  Option<String>,
  #[serde(default, deserialize_with = "lenient_text")]
  pub longitude: Option<String>,
  #[serde(default, rename = "type")]
  pub kind:      Option<String>,
  #[serde(default)]
  pub timezone:  Option<String>,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub cities:    Vec<SourceCity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCity {
  pub id:        i64,
  pub name:      String,
  #[serde(default, deserialize_with = "lenient_text")]
  pub latitude:  Option<String>,
  #[serde(default, deserialize_with = "lenient_text")]
  pub longitude: Option<String>,
  #[serde(default)]
  pub timezone:  Option<String>,
}

/// Row counts per table, either counted from a source tree or inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetCounts {
  pub countries: usize,
  pub states:    usize,
  pub cities:    usize,
}

impl DatasetCounts {
  /// Count every node of `countries` in a single walk.
  pub fn of(countries: &[SourceCountry]) -> Self {
    countries.iter().fold(Self::default(), |mut acc, country| {
      acc.countries += 1;
      acc.states += country.states.len();
      acc.cities += country.states.iter().map(|s| s.cities.len()).sum::<usize>();
      acc
    })
  }
}

/// Parse a whole source document.
pub fn parse_dataset(json: &str) -> serde_json::Result<Vec<SourceCountry>> {
  serde_json::from_str(json)
}

// ─── Serde helpers ───────────────────────────────────────────────────────────

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<Value>::deserialize(deserializer)? {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(s)) => Ok(Some(s)),
    Some(Value::Number(n)) => Ok(Some(n.to_string())),
    Some(Value::Bool(b)) => Ok(Some(b.to_string())),
    Some(other) => Err(serde::de::Error::custom(format!(
      "expected text or number, found {other}"
    ))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = r#"[
    {
      "id": 31, "name": "Brazil", "iso3": "BRA", "iso2": "BR",
      "numeric_code": "076", "phone_code": 55, "capital": "Brasilia",
      "translations": { "pt": "Brasil" },
      "states": [
        {
          "id": 2021, "name": "São Paulo", "state_code": "SP",
          "latitude": -23.5505, "longitude": "-46.6333", "type": "state",
          "cities": [
            { "id": 1, "name": "Santos", "latitude": "-23.96" },
            { "id": 2, "name": "Campinas" }
          ]
        },
        { "id": 2022, "name": "Acre", "cities": null }
      ]
    },
    { "id": 1, "name": "Antarctica", "states": [] },
    { "id": 2, "name": "Bouvet Island" }
  ]"#;

  #[test]
  fn parses_nested_tree_with_aliases() {
    let countries = parse_dataset(SAMPLE).unwrap();
    assert_eq!(countries.len(), 3);

    let brazil = &countries[0];
    assert_eq!(brazil.phonecode.as_deref(), Some("55"));
    assert_eq!(brazil.iso2.as_deref(), Some("BR"));
    assert!(brazil.emoji.is_none());

    let sp = &brazil.states[0];
    assert_eq!(sp.iso2.as_deref(), Some("SP"));
    assert_eq!(sp.latitude.as_deref(), Some("-23.5505"));
    assert_eq!(sp.longitude.as_deref(), Some("-46.6333"));
    assert_eq!(sp.kind.as_deref(), Some("state"));
    assert_eq!(sp.cities.len(), 2);
    assert!(sp.cities[1].latitude.is_none());

    assert!(brazil.states[1].cities.is_empty());
    assert!(countries[2].states.is_empty());
  }

  #[test]
  fn counts_every_level() {
    let countries = parse_dataset(SAMPLE).unwrap();
    assert_eq!(
      DatasetCounts::of(&countries),
      DatasetCounts { countries: 3, states: 2, cities: 2 }
    );
    assert_eq!(DatasetCounts::of(&[]), DatasetCounts::default());
  }

  #[test]
  fn missing_name_is_rejected() {
    let err = parse_dataset(r#"[{ "id": 5 }]"#).unwrap_err();
    assert!(err.to_string().contains("name"), "{err}");
  }

  #[test]
  fn structured_text_field_is_rejected() {
    let err = parse_dataset(r#"[{ "id": 5, "name": "X", "numeric_code": [1] }]"#)
      .unwrap_err();
    assert!(err.to_string().contains("expected text or number"), "{err}");
  }
}
