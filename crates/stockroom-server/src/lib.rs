//! Process wiring for the Stockroom HTTP service.
//!
//! Loads [`ServerConfig`], wraps [`stockroom_api::api_router`] in the tracing
//! and CORS layers, and hands the result to `main`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use axum::{Router, http::HeaderValue};
use chrono::Duration;
use config::{
  Config,
  ConfigBuilder,
  Environment,
  File,
  builder::DefaultState,
};
use serde::Deserialize;
use stockroom_api::{AppState, TokenIssuer, api_router};
use stockroom_core::store::InventoryStore;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};

/// Prefix for environment overrides, e.g. `STOCKROOM_SECRET_KEY`.
pub const ENV_PREFIX: &str = "STOCKROOM";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `stockroom.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:              String,
  #[serde(default = "default_port")]
  pub port:              u16,
  #[serde(default = "default_database_path")]
  pub database_path:     PathBuf,
  pub secret_key:        String,
  #[serde(default = "default_token_ttl")]
  pub token_ttl_minutes: i64,
  /// Empty means any origin.
  #[serde(default)]
  pub cors_origins:      Vec<String>,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 5000 }
fn default_database_path() -> PathBuf { PathBuf::from("inventory.db") }
fn default_token_ttl() -> i64 { stockroom_api::token::DEFAULT_TOKEN_TTL_MINUTES }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn token_issuer(&self) -> TokenIssuer {
    TokenIssuer::new(
      &self.secret_key,
      Duration::minutes(self.token_ttl_minutes),
    )
  }

  fn check(self) -> anyhow::Result<Self> {
    anyhow::ensure!(!self.secret_key.trim().is_empty(), "secret_key must not be empty");
    anyhow::ensure!(
      self.token_ttl_minutes > 0,
      "token_ttl_minutes must be positive, got {}",
      self.token_ttl_minutes
    );
    Ok(self)
  }
}

/// Read `path` (if it exists) and overlay `STOCKROOM_*` environment variables.
pub fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  let builder = Config::builder()
    .add_source(File::from(path).required(false))
    .add_source(
      Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors_origins"),
    );
  from_builder(builder)
}

fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<ServerConfig> {
  let settings = builder.build().context("failed to read configuration")?;
  let cfg: ServerConfig = settings
    .try_deserialize()
    .context("invalid configuration")?;
  cfg.check()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application ──────────────────────────────────────────────────────────────

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
  let allow = if origins.is_empty() {
    AllowOrigin::any()
  } else {
    let values = origins
      .iter()
      .map(|o| {
        HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin {o:?}"))
      })
      .collect::<anyhow::Result<Vec<_>>>()?;
    AllowOrigin::list(values)
  };
  Ok(
    CorsLayer::new()
      .allow_origin(allow)
      .allow_methods(Any)
      .allow_headers(Any),
  )
}

/// The full service: API routes plus CORS and request tracing.
pub fn app<S>(state: AppState<S>, cfg: &ServerConfig) -> anyhow::Result<Router>
where
  S: InventoryStore + Clone + 'static,
{
  Ok(
    api_router(state)
      .layer(cors_layer(&cfg.cors_origins)?)
      .layer(TraceLayer::new_for_http()),
  )
}

// ─── Tests ────────────────────────────────────────────────────────────────────
