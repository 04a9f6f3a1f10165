//! `terra` binary.
//!
//! ```text
//! terra [--config terra.toml] serve
//! terra [--config terra.toml] build-db [--source data.json] [--database database.sqlite]
//! ```
//!
//! `serve` is the default when no subcommand is given.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use terra_server::{ServerConfig, app, load_config};
use terra_store_sqlite::{SqliteStore, build_database};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Terra geographic reference API")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "terra.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API.
  Serve,
  /// Build the database from the JSON dataset, replacing any existing file.
  BuildDb {
    /// Dataset to read. Overrides `source_path`.
    #[arg(long)]
    source:   Option<PathBuf>,
    /// Database file to write. Overrides `database_path`.
    #[arg(long)]
    database: Option<PathBuf>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = load_config(&cli.config)?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(cfg).await,
    Command::BuildDb { source, database } => {
      let source = source.unwrap_or(cfg.source_path);
      let database = database.unwrap_or(cfg.database_path);
      let report = build_database(&source, &database)
        .await
        .with_context(|| format!("failed to build {}", database.display()))?;
      println!(
        "{}: {} countries, {} states, {} cities ({:.2} MB)",
        report.path.display(),
        report.counts.countries,
        report.counts.states,
        report.counts.cities,
        report.size_mb(),
      );
      Ok(())
    }
  }
}

async fn serve(cfg: ServerConfig) -> anyhow::Result<()> {
  let store = SqliteStore::open(&cfg.database_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.database_path))?;

  let app = app(Arc::new(store), &cfg);
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutdown requested");
}
