//! pantry server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite recipe store, and serves the JSON API over HTTP.
//!
//! # Loading a dataset
//!
//! ```
//! cargo run -p pantry-server --bin server -- load --data recipes.json
//! ```
//!
//! `serve` also loads `data_path` on startup when the store is empty and
//! `load_on_startup` is set.

mod app;
mod config;
mod loader;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use pantry_core::store::RecipeStore as _;
use pantry_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Pantry recipe catalog server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Replace the store contents with a JSON dataset and exit.
  Load {
    /// Dataset file; defaults to `data_path` from the config.
    #[arg(short, long)]
    data: Option<PathBuf>,
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
  let cfg = ServerConfig::load(&cli.config)?;

  let store = SqliteStore::open(&cfg.database_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.database_path))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Load { data } => {
      let path = data.unwrap_or_else(|| cfg.data_path.clone());
      let report = loader::load(&store, &path).await?;
      println!("loaded {} recipes ({} skipped)", report.inserted, report.skipped);
      Ok(())
    }
    Command::Serve => serve(&cfg, store).await,
  }
}

async fn serve(cfg: &ServerConfig, store: SqliteStore) -> anyhow::Result<()> {
  if cfg.load_on_startup {
    let count = store.count().await.context("failed to count recipes")?;
    if count == 0 {
      if let Err(e) = loader::load(&store, &cfg.data_path).await {
        warn!(error = %format!("{e:#}"), "startup load failed; serving an empty catalog");
      }
    } else {
      info!(count, "store already populated; skipping startup load");
    }
  }

  let app = app::router(Arc::new(store));
  let address = cfg.address();

  info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
