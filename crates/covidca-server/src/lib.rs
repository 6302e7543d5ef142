//! HTTP server for the covidca dashboard.
//!
//! Mounts the JSON API from [`covidca_api`] under `/api` and, when enabled,
//! runs the refresh scheduler as a background task sharing the same store.

pub mod error;

pub use error::{Error, Result};

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use covidca_api::{ApiState, api_router};
use covidca_charts::{Geography, Palette};
use covidca_core::{region::ProvinceCatalog, store::ObservationStore};
use covidca_feed::{FeedConfig, Fetcher};
use covidca_refresh::ScheduleConfig;
use serde::Deserialize;
use tokio::{sync::watch, task::JoinHandle};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  #[serde(default = "default_store_path")]
  pub store_path:       PathBuf,
  /// GeoJSON with one feature per province; enables the choropleth.
  #[serde(default)]
  pub geography_path:   Option<PathBuf>,
  /// Replaces the built-in name → code table.
  #[serde(default)]
  pub provinces:        Option<ProvinceCatalog>,
  #[serde(default)]
  pub palette:          Palette,
  /// Run the refresh scheduler inside the server process.
  #[serde(default)]
  pub embedded_refresh: bool,
  #[serde(default)]
  pub feed:             FeedConfig,
  #[serde(default)]
  pub schedule:         ScheduleConfig,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8050 }
fn default_store_path() -> PathBuf { PathBuf::from("covidca.db") }

// ─── Application state ────────────────────────────────────────────────────────

/// Build the handler state for `store` from `config`.
///
/// Reads the geography file, if one is configured.
pub fn build_state<S>(config: &ServerConfig, store: Arc<S>) -> Result<ApiState<S>> {
  let geography = match &config.geography_path {
    Some(path) => {
      let geo = Geography::from_path(path).map_err(|source| Error::Geography { path: path.clone(), source })?;
      tracing::info!(path = %path.display(), features = geo.names().len(), "geography loaded");
      Some(Arc::new(geo))
    }
    None => None,
  };

  Ok(ApiState {
    store,
    catalog: Arc::new(config.provinces.clone().unwrap_or_default()),
    palette: Arc::new(config.palette.clone()),
    geography,
  })
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: `/health` plus the API under `/api`.
pub fn app<S>(state: ApiState<S>) -> Router
where
  S: ObservationStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Embedded refresh ─────────────────────────────────────────────────────────

/// Start the refresh scheduler on `store` if `config.embedded_refresh` is set.
///
/// Returns `None` when disabled. The task ends once `shutdown` turns `true`.
pub fn spawn_embedded_refresh<S>(
  config: &ServerConfig,
  store: Arc<S>,
  shutdown: watch::Receiver<bool>,
) -> Result<Option<JoinHandle<()>>>
where
  S: ObservationStore + 'static,
{
  if !config.embedded_refresh {
    return Ok(None);
  }

  let cadence = config.schedule.cadence()?;
  let fetcher = Fetcher::new(config.feed.clone())?;
  tracing::info!(url = fetcher.url(), ?cadence, "embedded refresh enabled");

  Ok(Some(tokio::spawn(covidca_refresh::run(
    fetcher,
    store,
    cadence,
    config.schedule.run_on_start,
    shutdown,
  ))))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
