//! Service-level endpoints: liveness, the route catalog, and the JSON 404.

use axum::{Json, response::IntoResponse};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct Health {
  pub status:    &'static str,
  /// RFC 3339, UTC, millisecond precision.
  pub timestamp: String,
  pub version:   &'static str,
}

/// `GET /api/health`
pub async fn health() -> Json<Health> {
  Json(Health {
    status:    "OK",
    timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    version:   env!("CARGO_PKG_VERSION"),
  })
}

/// `GET /` — a self-description of the service with example requests.
pub async fn catalog() -> Json<Value> {
  Json(json!({
    "name": "Terra",
    "version": env!("CARGO_PKG_VERSION"),
    "description": "Read-only countries, states and cities reference API",
    "endpoints": {
      "GET /api/countries": "List countries (search, limit, offset)",
      "GET /api/countries/{id}": "One country by numeric id, ISO2 or ISO3 code",
      "GET /api/countries/{id}/states": "States of a country (search, limit, offset)",
      "GET /api/countries/{id}/cities": "Cities of a country with their state (search, limit, offset)",
      "GET /api/states/{id}/cities": "Cities of a state (search, limit, offset)",
      "GET /api/search?q=term": "Search countries, states and cities (type, limit)",
      "GET /api/health": "Liveness check",
    },
    "examples": {
      "Countries matching \"bra\"": "/api/countries?search=bra",
      "Brazil": "/api/countries/BR",
      "States of Brazil": "/api/countries/BR/states",
      "Cities of São Paulo": "/api/states/2021/cities?limit=10",
      "Cities matching \"paulo\"": "/api/search?q=paulo&type=cities",
    },
  }))
}

/// Any unmatched route.
pub async fn fallback() -> impl IntoResponse {
  ApiError::NotFound("route not found".to_owned())
}
