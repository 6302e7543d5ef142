//! Handlers for `/charts` endpoints. Each returns a Plotly figure as JSON.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/charts/metrics` | All six tabs; optional `?region=` (default `Canada`) |
//! | `GET`  | `/charts/metrics/{metric}` | One tab, e.g. `newtotal`; 400 on unknown metric |
//! | `GET`  | `/charts/ranking` | Provinces by latest cumulative cases |
//! | `GET`  | `/charts/choropleth` | 404 unless a geography is configured |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use covidca_charts::{Figure, MetricFigure};
use covidca_core::{
  metric::{Field, Metric},
  store::ObservationStore,
};
use serde::Deserialize;

use crate::{ApiState, DEFAULT_REGION, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RegionParams {
  pub region: Option<String>,
}

impl RegionParams {
  fn region(&self) -> &str { self.region.as_deref().unwrap_or(DEFAULT_REGION) }
}

// ─── Metric tabs ──────────────────────────────────────────────────────────────

/// `GET /charts/metrics[?region=<name>]`
pub async fn metrics<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<RegionParams>,
) -> Result<Json<Vec<MetricFigure>>, ApiError>
where
  S: ObservationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let region = params.region();
  let series = state
    .store
    .series_for(region, &Field::ALL)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(covidca_charts::metric_charts(region, &series, &state.palette)))
}

/// `GET /charts/metrics/{metric}[?region=<name>]`
pub async fn metric<S>(
  State(state): State<ApiState<S>>,
  Path(metric): Path<String>,
  Query(params): Query<RegionParams>,
) -> Result<Json<Figure>, ApiError>
where
  S: ObservationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let metric: Metric = metric.parse()?;
  let region = params.region();
  let series = state
    .store
    .series_for(region, &[metric.field])
    .await
    .map_err(ApiError::store)?;
  Ok(Json(covidca_charts::metric_chart(metric, region, &series, &state.palette)))
}

// ─── Province views ───────────────────────────────────────────────────────────

/// `GET /charts/ranking`
pub async fn ranking<S>(State(state): State<ApiState<S>>) -> Result<Json<Figure>, ApiError>
where
  S: ObservationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let latest = state
    .store
    .latest_by_province(Field::Cases)
    .await
    .map_err(ApiError::store)?;
  let figure = covidca_charts::ranking_chart(&latest, &state.catalog, &state.palette)?;
  Ok(Json(figure))
}

/// `GET /charts/choropleth`
pub async fn choropleth<S>(State(state): State<ApiState<S>>) -> Result<Json<Figure>, ApiError>
where
  S: ObservationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let geography = state
    .geography
    .as_ref()
    .ok_or_else(|| ApiError::NotFound("no geography configured".to_owned()))?;
  let latest = state
    .store
    .latest_by_province(Field::Cases)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(covidca_charts::choropleth(&latest, geography, &state.palette)))
}
