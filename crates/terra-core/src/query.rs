//! Request-side types shared by every list operation: country keys, search
//! filters and pagination.

/// Default page size for `GET /countries`.
pub const COUNTRIES_DEFAULT_LIMIT: i64 = 50;
/// Default page size for child listings (states, cities).
pub const CHILDREN_DEFAULT_LIMIT: i64 = 100;
/// Default per-bucket limit for the fan-out search.
pub const SEARCH_DEFAULT_LIMIT: i64 = 20;

// ─── Country key ─────────────────────────────────────────────────────────────

/// How a single country is addressed: by numeric id or by ISO code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryKey {
  Id(i64),
  /// An ISO 3166 alpha-2 or alpha-3 code, already uppercased.
  Code(String),
}

impl CountryKey {
  /// An all-digit key is an id; anything else is matched against `iso2` and
  /// `iso3` after uppercasing. Digit strings too large for an id fall back to
  /// code matching, which simply finds nothing.
  pub fn parse(key: &str) -> Self {
    if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
      && let Ok(id) = key.parse()
    {
      return Self::Id(id);
    }
    Self::Code(key.to_uppercase())
  }
}

// ─── Pagination ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
  pub limit:  i64,
  pub offset: i64,
}

impl Pagination {
  pub fn new(limit: i64, offset: i64) -> Self { Self { limit, offset } }

  /// Build a page from raw query-string values.
  ///
  /// Missing, non-numeric and negative values fall back to `default_limit`
  /// and an offset of zero. `max_limit`, when set, caps the page size.
  pub fn from_params(
    limit: Option<&str>,
    offset: Option<&str>,
    default_limit: i64,
    max_limit: Option<i64>,
  ) -> Self {
    let limit = parse_count(limit).unwrap_or(default_limit);
    let limit = match max_limit {
      Some(max) => limit.min(max),
      None => limit,
    };
    Self { limit, offset: parse_count(offset).unwrap_or(0) }
  }
}

/// Read the leading integer of `raw`: optional whitespace, an optional sign,
/// then ASCII digits. Anything after the digits is ignored, so `"10.5"` is 10
/// and `"20px"` is 20. No leading digits, a negative value or overflow yields
/// `None`.
fn parse_count(raw: Option<&str>) -> Option<i64> {
  let s = raw?.trim_start();
  let unsigned = s.strip_prefix('+').unwrap_or(s);
  let end = unsigned
    .find(|c: char| !c.is_ascii_digit())
    .unwrap_or(unsigned.len());
  if end == 0 {
    return None;
  }
  unsigned[..end].parse::<i64>().ok()
}

// ─── List query ──────────────────────────────────────────────────────────────

/// Optional name filter plus a page window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
  /// Case-insensitive substring; never empty.
  pub search:     Option<String>,
  pub pagination: Pagination,
}

impl ListQuery {
  pub fn new(search: Option<String>, pagination: Pagination) -> Self {
    Self { search: search.filter(|s| !s.is_empty()), pagination }
  }

  /// All rows on the first page of `limit` rows.
  pub fn all(limit: i64) -> Self { Self::new(None, Pagination::new(limit, 0)) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn digit_keys_are_ids() {
    assert_eq!(CountryKey::parse("31"), CountryKey::Id(31));
    assert_eq!(CountryKey::parse("007"), CountryKey::Id(7));
  }

  #[test]
  fn other_keys_are_uppercased_codes() {
    assert_eq!(CountryKey::parse("br"), CountryKey::Code("BR".into()));
    assert_eq!(CountryKey::parse("bRa"), CountryKey::Code("BRA".into()));
    assert_eq!(CountryKey::parse("-1"), CountryKey::Code("-1".into()));
    assert_eq!(CountryKey::parse("12a"), CountryKey::Code("12A".into()));
  }

  #[test]
  fn overflowing_digits_become_a_code() {
    let key = "99999999999999999999999";
    assert_eq!(CountryKey::parse(key), CountryKey::Code(key.into()));
  }

  #[test]
  fn pagination_defaults() {
    assert_eq!(
      Pagination::from_params(None, None, 50, None),
      Pagination::new(50, 0)
    );
    assert_eq!(
      Pagination::from_params(Some("abc"), Some("x"), 100, None),
      Pagination::new(100, 0)
    );
    assert_eq!(
      Pagination::from_params(Some("-5"), Some("-1"), 20, None),
      Pagination::new(20, 0)
    );
  }

  #[test]
  fn pagination_parses_values() {
    assert_eq!(
      Pagination::from_params(Some("10"), Some(" 30 "), 50, None),
      Pagination::new(10, 30)
    );
    assert_eq!(
      Pagination::from_params(Some("100000"), None, 50, None),
      Pagination::new(100_000, 0)
    );
  }

  #[test]
  fn pagination_reads_leading_digits() {
    assert_eq!(
      Pagination::from_params(Some("10.5"), Some("4.9"), 50, None),
      Pagination::new(10, 4)
    );
    assert_eq!(
      Pagination::from_params(Some("20px"), None, 50, None),
      Pagination::new(20, 0)
    );
    assert_eq!(
      Pagination::from_params(Some("3e2"), Some("+7"), 50, None),
      Pagination::new(3, 7)
    );
    assert_eq!(
      Pagination::from_params(Some(".5"), Some("-2.5"), 50, None),
      Pagination::new(50, 0)
    );
  }

  #[test]
  fn pagination_caps_when_configured() {
    assert_eq!(
      Pagination::from_params(Some("5000"), None, 50, Some(500)),
      Pagination::new(500, 0)
    );
    assert_eq!(
      Pagination::from_params(None, None, 100, Some(10)),
      Pagination::new(10, 0)
    );
  }

  #[test]
  fn empty_search_is_absent() {
    let q = ListQuery::new(Some(String::new()), Pagination::new(1, 0));
    assert!(q.search.is_none());
  }
}
