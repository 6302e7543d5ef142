//! JSON API for the covidca dashboard.
//!
//! Exposes an axum [`Router`] backed by any
//! [`covidca_core::store::ObservationStore`]. Query results and chart
//! figures are returned as JSON; rendering is the client's job.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", covidca_api::api_router(state))
//! ```

pub mod charts;
pub mod data;
pub mod error;

use std::sync::Arc;

use axum::{Router, routing::get};
use covidca_charts::{Geography, Palette};
use covidca_core::{region::ProvinceCatalog, store::ObservationStore};

pub use error::ApiError;

/// Region used when a request names none.
pub const DEFAULT_REGION: &str = "Canada";

// ─── State ────────────────────────────────────────────────────────────────────

/// Everything a handler needs, built once at start-up.
pub struct ApiState<S> {
  pub store:     Arc<S>,
  pub catalog:   Arc<ProvinceCatalog>,
  pub palette:   Arc<Palette>,
  /// `None` disables the choropleth endpoint.
  pub geography: Option<Arc<Geography>>,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      catalog: Arc::new(ProvinceCatalog::default()),
      palette: Arc::new(Palette::default()),
      geography: None,
    }
  }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      catalog:   Arc::clone(&self.catalog),
      palette:   Arc::clone(&self.palette),
      geography: self.geography.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: ObservationStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Query layer
    .route("/provinces", get(data::provinces::<S>))
    .route("/latest", get(data::latest::<S>))
    .route("/series/{province}", get(data::series::<S>))
    .route("/latest-delta/{province}", get(data::latest_delta::<S>))
    .route("/status", get(data::status::<S>))
    // Charts
    .route("/charts/metrics", get(charts::metrics::<S>))
    .route("/charts/metrics/{metric}", get(charts::metric::<S>))
    .route("/charts/ranking", get(charts::ranking::<S>))
    .route("/charts/choropleth", get(charts::choropleth::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
