//! HTTP server assembly for the Udyam registration backend.
//!
//! Mounts the [`udyam_api`] router under `/api/v1`, the health probe at `/`,
//! and wraps everything in request tracing and (optionally) CORS.

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  http::{HeaderValue, Method, header},
  routing::get,
};
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, CorsLayer},
  trace::TraceLayer,
};
use udyam_core::{registrar::Registrar, store::ApplicationStore, verify::IdentityVerifier};

/// Path prefix under which the registration API is served.
pub const API_PREFIX: &str = "/api/v1";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `UDYAM_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  #[serde(default = "default_store_path")]
  pub store_path:           PathBuf,
  /// Browser origins allowed to call the API. Empty disables CORS.
  #[serde(default)]
  pub cors_allowed_origins: Vec<String>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8000 }

fn default_store_path() -> PathBuf { PathBuf::from("udyam.sqlite3") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 default_host(),
      port:                 default_port(),
      store_path:           default_store_path(),
      cors_allowed_origins: Vec::new(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
pub fn router<S, V>(
  registrar: Arc<Registrar<S, V>>,
  config: &ServerConfig,
) -> anyhow::Result<Router>
where
  S: ApplicationStore + 'static,
  V: IdentityVerifier + 'static,
{
  let mut router = Router::new()
    .nest(API_PREFIX, udyam_api::api_router(registrar))
    .route("/", get(udyam_api::health::handler))
    .layer(TraceLayer::new_for_http());

  if let Some(cors) = cors_layer(&config.cors_allowed_origins)? {
    router = router.layer(cors);
  }

  Ok(router)
}

fn cors_layer(origins: &[String]) -> anyhow::Result<Option<CorsLayer>> {
  let origins = origins
    .iter()
    .map(|o| o.trim())
    .filter(|o| !o.is_empty())
    .map(|o| {
      HeaderValue::from_str(o).map_err(|e| anyhow::anyhow!("invalid CORS origin {o:?}: {e}"))
    })
    .collect::<anyhow::Result<Vec<_>>>()?;

  if origins.is_empty() {
    return Ok(None);
  }

  Ok(Some(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods([Method::GET, Method::POST])
      .allow_headers([header::CONTENT_TYPE]),
  ))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
