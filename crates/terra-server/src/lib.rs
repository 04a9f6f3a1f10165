//! Process-level wiring for the Terra server: configuration, CORS and
//! request tracing around the [`terra_api`] router.

use std::{path::{Path, PathBuf}, sync::Arc};

use anyhow::Context as _;
use axum::{
  Router,
  http::{HeaderName, HeaderValue, Method, header},
};
use serde::Deserialize;
use terra_api::ApiOptions;
use terra_core::store::GeoStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Origins allowed when none are configured.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 6] = [
  "http://localhost:3000",
  "http://localhost:3001",
  "http://localhost:8080",
  "http://127.0.0.1:3000",
  "http://127.0.0.1:3001",
  "http://127.0.0.1:8080",
];

/// Runtime server configuration, deserialised from `terra.toml` and
/// `TERRA_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub database_path:   PathBuf,
  /// Nested JSON dataset read by `build-db`.
  pub source_path:     PathBuf,
  pub allowed_origins: Vec<String>,
  #[serde(default)]
  pub max_page_size:   Option<i64>,
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn api_options(&self) -> ApiOptions {
    ApiOptions { max_page_size: self.max_page_size }
  }
}

/// Load configuration from the optional file at `path`, then the
/// environment. Later sources win.
///
/// `TERRA_ALLOWED_ORIGINS` is a comma-separated list.
pub fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  build_config(path, Some(terra_env()))
}

/// The `TERRA_*` environment source.
fn terra_env() -> config::Environment {
  config::Environment::with_prefix("TERRA")
    .try_parsing(true)
    .list_separator(",")
    .with_list_parse_key("allowed_origins")
}

fn build_config(path: &Path, env: Option<config::Environment>) -> anyhow::Result<ServerConfig> {
  let origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect();

  let mut builder = config::Config::builder()
    .set_default("host", "0.0.0.0")?
    .set_default("port", 3000)?
    .set_default("database_path", "database.sqlite")?
    .set_default("source_path", "countries+states+cities.json")?
    .set_default("allowed_origins", origins)?
    .add_source(config::File::from(path).required(false));
  if let Some(env) = env {
    builder = builder.add_source(env);
  }

  builder
    .build()
    .with_context(|| format!("failed to read config from {}", path.display()))?
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

// ─── Layers ───────────────────────────────────────────────────────────────────

/// CORS for a read-only API: `GET` and `OPTIONS` from `origins` only, with
/// credentials. Other origins are still served, just without CORS headers,
/// so the browser enforces the policy instead of the server.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
  let allowed: Vec<HeaderValue> = origins
    .iter()
    .filter_map(|origin| match origin.trim().parse() {
      Ok(value) => Some(value),
      Err(_) => {
        tracing::warn!(%origin, "ignoring invalid CORS origin");
        None
      }
    })
    .collect();

  CorsLayer::new()
    .allow_origin(allowed)
    .allow_methods([Method::GET, Method::OPTIONS])
    .allow_headers([
      header::CONTENT_TYPE,
      header::AUTHORIZATION,
      HeaderName::from_static("x-requested-with"),
      header::ACCEPT,
      header::ORIGIN,
    ])
    .allow_credentials(true)
}

/// The full HTTP application for `store` under `cfg`.
pub fn app<S>(store: Arc<S>, cfg: &ServerConfig) -> Router
where
  S: GeoStore + 'static,
{
  terra_api::router(store, cfg.api_options())
    .layer(cors_layer(&cfg.allowed_origins))
    .layer(TraceLayer::new_for_http())
}
