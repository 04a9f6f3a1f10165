//! Fan-out search across countries, states and cities.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
  Error, Result,
  geo::{CityMatch, Country, StateMatch},
  store::GeoStore,
};

/// Shortest accepted search text, in characters.
pub const MIN_QUERY_CHARS: usize = 2;

/// Which entity buckets a search covers.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchKind {
  #[default]
  All,
  Countries,
  States,
  Cities,
}

impl SearchKind {
  fn covers(self, bucket: SearchKind) -> bool { self == SearchKind::All || self == bucket }
}

/// A validated fan-out search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
  pub text:  String,
  pub kind:  SearchKind,
  /// Applied to each bucket independently.
  pub limit: i64,
}

impl SearchRequest {
  /// Validate raw request values. A missing `kind` means [`SearchKind::All`].
  pub fn new(text: Option<&str>, kind: Option<&str>, limit: i64) -> Result<Self> {
    let text = text.unwrap_or_default();
    if text.chars().count() < MIN_QUERY_CHARS {
      return Err(Error::QueryTooShort { min: MIN_QUERY_CHARS });
    }
    let kind = match kind {
      None => SearchKind::All,
      Some(raw) => raw
        .parse()
        .map_err(|_| Error::UnknownSearchKind(raw.to_owned()))?,
    };
    Ok(Self { text: text.to_owned(), kind, limit })
  }
}

/// One bucket per entity type; buckets not covered by the request are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBuckets {
  pub countries: Vec<Country>,
  pub states:    Vec<StateMatch>,
  pub cities:    Vec<CityMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
  pub query:   String,
  pub results: SearchBuckets,
  /// Combined size of all buckets.
  pub total:   usize,
}

/// Run every sub-query `request` covers concurrently and assemble the result
/// once all of them have completed. The first failing sub-query fails the
/// whole search.
pub async fn fan_out<S: GeoStore>(
  store: &S,
  request: &SearchRequest,
) -> Result<SearchResults, S::Error> {
  let text = request.text.as_str();
  let limit = request.limit;

  let countries = async {
    if request.kind.covers(SearchKind::Countries) {
      store.search_countries(text, limit).await
    } else {
      Ok(Vec::new())
    }
  };
  let states = async {
    if request.kind.covers(SearchKind::States) {
      store.search_states(text, limit).await
    } else {
      Ok(Vec::new())
    }
  };
  let cities = async {
    if request.kind.covers(SearchKind::Cities) {
      store.search_cities(text, limit).await
    } else {
      Ok(Vec::new())
    }
  };

  let (countries, states, cities) = tokio::try_join!(countries, states, cities)?;
  let total = countries.len() + states.len() + cities.len();

  Ok(SearchResults {
    query: request.text.clone(),
    results: SearchBuckets { countries, states, cities },
    total,
  })
}

#[cfg(test)]
mod tests {
  use std::convert::Infallible;

  use super::*;
  use crate::{
    geo::{City, CountryCity, State},
    query::{CountryKey, ListQuery},
  };

  /// Returns one row per bucket regardless of the text.
  struct OneOfEach;

  fn country() -> Country {
    Country {
      id:              1,
      name:            "Samoa".into(),
      iso3:            None,
      iso2:            Some("WS".into()),
      numeric_code:    None,
      phonecode:       None,
      capital:         None,
      currency:        None,
      currency_name:   None,
      currency_symbol: None,
      tld:             None,
      native:          None,
      region:          None,
      subregion:       None,
      nationality:     None,
      emoji:           None,
      emoji_u:         None,
      created_at:      None,
    }
  }

  fn state() -> State {
    State {
      id:         2,
      country_id: 1,
      name:       "Savai'i".into(),
      iso2:       None,
      iso3166_2:  None,
      latitude:   None,
      longitude:  None,
      kind:       None,
      timezone:   None,
    }
  }

  fn city() -> City {
    City {
      id:        3,
      state_id:  2,
      name:      "Salelologa".into(),
      latitude:  None,
      longitude: None,
      timezone:  None,
    }
  }

  impl GeoStore for OneOfEach {
    type Error = Infallible;

    async fn list_countries(&self, _: &ListQuery) -> Result<Vec<Country>, Infallible> {
      Ok(vec![country()])
    }

    async fn get_country(&self, _: &CountryKey) -> Result<Option<Country>, Infallible> {
      Ok(Some(country()))
    }

    async fn list_states(&self, _: &str, _: &ListQuery) -> Result<Vec<State>, Infallible> {
      Ok(vec![state()])
    }

    async fn list_state_cities(&self, _: &str, _: &ListQuery) -> Result<Vec<City>, Infallible> {
      Ok(vec![city()])
    }

    async fn list_country_cities(
      &self,
      _: &str,
      _: &ListQuery,
    ) -> Result<Vec<CountryCity>, Infallible> {
      Ok(Vec::new())
    }

    async fn search_countries(&self, _: &str, _: i64) -> Result<Vec<Country>, Infallible> {
      Ok(vec![country()])
    }

    async fn search_states(&self, _: &str, _: i64) -> Result<Vec<StateMatch>, Infallible> {
      Ok(vec![StateMatch {
        state:        state(),
        country_name: "Samoa".into(),
        country_iso2: Some("WS".into()),
      }])
    }

    async fn search_cities(&self, _: &str, _: i64) -> Result<Vec<CityMatch>, Infallible> {
      Ok(vec![CityMatch {
        city:         city(),
        state_name:   "Savai'i".into(),
        country_name: "Samoa".into(),
      }])
    }
  }

  /// Like [`OneOfEach`], except that searching states always fails.
  struct StatesDown;

  fn disk_error() -> std::io::Error { std::io::Error::other("disk I/O error") }

  impl GeoStore for StatesDown {
    type Error = std::io::Error;

    async fn list_countries(&self, _: &ListQuery) -> std::io::Result<Vec<Country>> {
      Ok(vec![country()])
    }

    async fn get_country(&self, _: &CountryKey) -> std::io::Result<Option<Country>> {
      Ok(Some(country()))
    }

    async fn list_states(&self, _: &str, _: &ListQuery) -> std::io::Result<Vec<State>> {
      Ok(vec![state()])
    }

    async fn list_state_cities(&self, _: &str, _: &ListQuery) -> std::io::Result<Vec<City>> {
      Ok(vec![city()])
    }

    async fn list_country_cities(
      &self,
      _: &str,
      _: &ListQuery,
    ) -> std::io::Result<Vec<CountryCity>> {
      Ok(Vec::new())
    }

    async fn search_countries(&self, _: &str, _: i64) -> std::io::Result<Vec<Country>> {
      Ok(vec![country()])
    }

    async fn search_states(&self, _: &str, _: i64) -> std::io::Result<Vec<StateMatch>> {
      Err(disk_error())
    }

    async fn search_cities(&self, _: &str, _: i64) -> std::io::Result<Vec<CityMatch>> {
      Ok(Vec::new())
    }
  }

  #[test]
  fn short_queries_are_rejected_for_every_kind() {
    for kind in [None, Some("all"), Some("countries"), Some("states"), Some("cities")] {
      for text in [None, Some(""), Some("a"), Some("é")] {
        let err = SearchRequest::new(text, kind, 20).unwrap_err();
        assert!(matches!(err, Error::QueryTooShort { min: 2 }), "{text:?} {kind:?}");
      }
    }
  }

  #[test]
  fn two_multibyte_chars_are_enough() {
    let req = SearchRequest::new(Some("São"), None, 5).unwrap();
    assert_eq!(req.kind, SearchKind::All);
    assert!(SearchRequest::new(Some("éé"), None, 5).is_ok());
  }

  #[test]
  fn unknown_kind_is_rejected() {
    let err = SearchRequest::new(Some("Sa"), Some("planets"), 5).unwrap_err();
    assert!(matches!(err, Error::UnknownSearchKind(ref k) if k == "planets"));
  }

  #[tokio::test]
  async fn all_fills_every_bucket() {
    let req = SearchRequest::new(Some("Sa"), Some("all"), 20).unwrap();
    let results = fan_out(&OneOfEach, &req).await.unwrap();
    assert_eq!(results.query, "Sa");
    assert_eq!(results.results.countries.len(), 1);
    assert_eq!(results.results.states.len(), 1);
    assert_eq!(results.results.cities.len(), 1);
    assert_eq!(results.total, 3);
  }

  #[tokio::test]
  async fn narrowed_kind_leaves_other_buckets_empty() {
    let req = SearchRequest::new(Some("Sa"), Some("states"), 20).unwrap();
    let results = fan_out(&OneOfEach, &req).await.unwrap();
    assert!(results.results.countries.is_empty());
    assert!(results.results.cities.is_empty());
    assert_eq!(results.results.states[0].country_name, "Samoa");
    assert_eq!(results.total, 1);
  }

  #[tokio::test]
  async fn failing_bucket_fails_the_whole_search() {
    let req = SearchRequest::new(Some("Sa"), None, 20).unwrap();
    let err = fan_out(&StatesDown, &req).await.unwrap_err();
    assert_eq!(err.to_string(), "disk I/O error");

    let req = SearchRequest::new(Some("Sa"), Some("states"), 20).unwrap();
    assert!(fan_out(&StatesDown, &req).await.is_err());
  }

  #[tokio::test]
  async fn failing_bucket_outside_the_kind_is_not_queried() {
    let req = SearchRequest::new(Some("Sa"), Some("countries"), 20).unwrap();
    let results = fan_out(&StatesDown, &req).await.unwrap();
    assert_eq!(results.total, 1);
  }

  #[test]
  fn results_serialise_with_nested_buckets() {
    let results = SearchResults {
      query:   "Sa".into(),
      results: SearchBuckets::default(),
      total:   0,
    };
    let json = serde_json::to_value(&results).unwrap();
    assert_eq!(json["results"]["countries"], serde_json::json!([]));
    assert_eq!(json["total"], 0);
  }
}
