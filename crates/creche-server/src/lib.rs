//! Server configuration and HTTP application assembly for the crèche
//! manager. The `creche` binary in `main.rs` wires these together.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use creche_api::Session;
use creche_core::{
  payment::{Amount, MONTHLY_FEE},
  store::CrecheStore,
};
use creche_store_rest::RestConfig;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Used when neither the config nor the environment names a hosted
/// database: a Supabase instance started locally with its CLI.
pub const DEV_BACKEND_URL: &str = "http://127.0.0.1:54321";
pub const DEV_BACKEND_KEY: &str = "local-development-anon-key";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CRECHE_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:        String,
  #[serde(default = "default_port")]
  pub port:        u16,
  #[serde(default = "default_fee")]
  pub monthly_fee: Amount,
  #[serde(default)]
  pub backend:     BackendConfig,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_fee() -> Amount { MONTHLY_FEE }

/// Which store the session writes through to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
  /// Hosted PostgREST database.
  Rest {
    #[serde(default)]
    url:     Option<String>,
    #[serde(default)]
    api_key: Option<String>,
  },
  /// Local SQLite file.
  Sqlite { path: PathBuf },
}

impl Default for BackendConfig {
  fn default() -> Self { BackendConfig::Rest { url: None, api_key: None } }
}

/// Credentials given on the command line or through `SUPABASE_*`.
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
  pub url:     Option<String>,
  pub api_key: Option<String>,
}

impl ServerConfig {
  /// Read `path` (if it exists) and overlay `CRECHE_*` environment
  /// variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(Self::environment())
      .build()?
      .try_deserialize()
  }

  /// `CRECHE_PORT`, `CRECHE_BACKEND__KIND`, ...: one underscore after the
  /// prefix, two between nested keys.
  pub fn environment() -> config::Environment {
    config::Environment::with_prefix("CRECHE")
      .prefix_separator("_")
      .separator("__")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Resolve the hosted-database credentials: explicit overrides first, then
/// the config file, then the local development pair.
pub fn rest_config(
  url: Option<&str>,
  api_key: Option<&str>,
  overrides: &CredentialOverrides,
) -> RestConfig {
  RestConfig {
    url:     first_set(overrides.url.as_deref(), url, DEV_BACKEND_URL),
    api_key: first_set(overrides.api_key.as_deref(), api_key, DEV_BACKEND_KEY),
  }
}

fn first_set(over: Option<&str>, file: Option<&str>, fallback: &str) -> String {
  [over, file]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|s| !s.is_empty())
    .unwrap_or(fallback)
    .to_owned()
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

/// The full HTTP application: the JSON API under `/api`, with request
/// tracing.
pub fn app<S>(session: Arc<Session<S>>) -> Router
where
  S: CrecheStore + 'static,
{
  Router::new()
    .nest("/api", creche_api::api_router(session))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use creche_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_config_uses_defaults() {
    let cfg = parse("");
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.monthly_fee, MONTHLY_FEE);
    assert_eq!(cfg.backend, BackendConfig::default());
  }

  #[test]
  fn sqlite_backend_is_selected_by_kind() {
    let cfg = parse(
      r#"
      port = 9000
      monthly_fee = 12000

      [backend]
      kind = "sqlite"
      path = "/var/lib/creche.db"
      "#,
    );
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.monthly_fee, 12_000);
    assert_eq!(cfg.backend, BackendConfig::Sqlite { path: "/var/lib/creche.db".into() });
  }

  #[test]
  fn environment_overrides_file_values() {
    let vars: config::Map<String, String> = [
      ("CRECHE_PORT", "9123"),
      ("CRECHE_MONTHLY_FEE", "12000"),
      ("CRECHE_BACKEND__KIND", "sqlite"),
      ("CRECHE_BACKEND__PATH", "/tmp/creche.db"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect();

    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str("port = 8000", config::FileFormat::Toml))
      .add_source(ServerConfig::environment().source(Some(vars)))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert_eq!(cfg.port, 9123);
    assert_eq!(cfg.monthly_fee, 12_000);
    assert_eq!(cfg.backend, BackendConfig::Sqlite { path: "/tmp/creche.db".into() });
  }

  #[test]
  fn overrides_beat_config_file_credentials() {
    let overrides = CredentialOverrides { url: Some("https://env.example".into()), api_key: None };
    let rest = rest_config(Some("https://file.example"), Some("file-key"), &overrides);
    assert_eq!(rest.url, "https://env.example");
    assert_eq!(rest.api_key, "file-key");
  }

  #[test]
  fn missing_credentials_fall_back_to_local_instance() {
    let rest = rest_config(None, Some("  "), &CredentialOverrides::default());
    assert_eq!(rest.url, DEV_BACKEND_URL);
    assert_eq!(rest.api_key, DEV_BACKEND_KEY);
  }

  #[test]
  fn tilde_expands_to_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/creche.db")), PathBuf::from(home).join("creche.db"));
    assert_eq!(expand_tilde(Path::new("/abs/creche.db")), PathBuf::from("/abs/creche.db"));
  }

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let session = Arc::new(Session::new(store, MONTHLY_FEE));
    session.load().await.unwrap();

    let req = Request::builder().uri("/api/status").body(Body::empty()).unwrap();
    let resp = app(session).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["load"]["state"], "ready");
  }
}
