//! Stockroom server binary.
//!
//! Reads `stockroom.toml` (or the path given with `--config`), overlays
//! `STOCKROOM_*` environment variables, opens the SQLite database and serves
//! the JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use stockroom_api::AppState;
use stockroom_server::{app, expand_tilde, load_config};
use stockroom_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Stockroom inventory server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "stockroom.toml")]
  config: PathBuf,
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
  let cfg = load_config(&cli.config)
    .with_context(|| format!("failed to load {:?}", cli.config))?;

  let db_path = expand_tilde(&cfg.database_path);
  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open database at {db_path:?}"))?;
  tracing::info!(path = ?db_path, "database ready");

  let state = AppState {
    store:  Arc::new(store),
    tokens: Arc::new(cfg.token_issuer()),
  };
  let router = app(state, &cfg)?;
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, router).await.context("server error")?;

  Ok(())
}
