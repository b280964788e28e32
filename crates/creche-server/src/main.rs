//! `creche` server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the
//! configured store, loads the roster once, and serves the JSON API over
//! HTTP. A failed initial load does not stop the server; the API answers 503
//! until `POST /api/reload` succeeds.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use creche_api::Session;
use creche_core::store::CrecheStore;
use creche_server::{BackendConfig, CredentialOverrides, ServerConfig, expand_tilde, rest_config};
use creche_store_rest::RestStore;
use creche_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Crèche manager server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Hosted database URL; overrides `backend.url`.
  #[arg(long, env = "SUPABASE_URL")]
  supabase_url: Option<String>,

  /// Hosted database anon key; overrides `backend.api_key`.
  #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
  supabase_anon_key: Option<String>,
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

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to read configuration from {:?}", cli.config))?;
  anyhow::ensure!(server_cfg.monthly_fee > 0, "monthly_fee must be positive");

  let overrides = CredentialOverrides { url: cli.supabase_url, api_key: cli.supabase_anon_key };

  match &server_cfg.backend {
    BackendConfig::Rest { url, api_key } => {
      let rest = rest_config(url.as_deref(), api_key.as_deref(), &overrides);
      tracing::info!(url = %rest.url, "using hosted database");
      let store = RestStore::new(rest).context("failed to build HTTP client")?;
      serve(store, &server_cfg).await
    }
    BackendConfig::Sqlite { path } => {
      let path = expand_tilde(path);
      tracing::info!(path = %path.display(), "using local database");
      let store = SqliteStore::open(&path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?;
      serve(store, &server_cfg).await
    }
  }
}

async fn serve<S: CrecheStore + 'static>(store: S, cfg: &ServerConfig) -> anyhow::Result<()> {
  let session = Arc::new(Session::new(store, cfg.monthly_fee));
  if session.load().await.is_err() {
    tracing::warn!("starting without data; POST /api/reload to retry");
  }

  let app = creche_server::app(session);
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
