//! Handlers for the query endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/provinces` | Dropdown entries, upstream order |
//! | `GET`  | `/latest` | Optional `?field=cases\|deaths\|tests` (default `cases`) |
//! | `GET`  | `/series/{province}` | Optional `?fields=cases,deaths` |
//! | `GET`  | `/latest-delta/{province}` | `null` for an unknown province |
//! | `GET`  | `/status` | Last refresh, `null` before the first one |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use covidca_core::{
  metric::Field,
  observation::{ProvinceValue, RefreshRecord},
  series::{Series, SeriesPoint},
  store::ObservationStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

// ─── Provinces ────────────────────────────────────────────────────────────────

/// `GET /provinces`
pub async fn provinces<S>(State(state): State<ApiState<S>>) -> Result<Json<Vec<String>>, ApiError>
where
  S: ObservationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let names = state.store.provinces().await.map_err(ApiError::store)?;
  Ok(Json(names))
}

// ─── Latest ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LatestParams {
  /// Kept as a string so a bad value becomes a JSON error body.
  pub field: Option<String>,
}

/// `GET /latest[?field=<field>]`
pub async fn latest<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<LatestParams>,
) -> Result<Json<Vec<ProvinceValue>>, ApiError>
where
  S: ObservationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let field = match params.field.as_deref() {
    Some(s) => s.parse::<Field>()?,
    None => Field::Cases,
  };
  let values = state.store.latest_by_province(field).await.map_err(ApiError::store)?;
  Ok(Json(values))
}

// ─── Series ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SeriesParams {
  pub fields: Option<String>,
}

/// `GET /series/{province}[?fields=<f1,f2>]`
///
/// An unknown province yields an empty series, not a 404.
pub async fn series<S>(
  State(state): State<ApiState<S>>,
  Path(province): Path<String>,
  Query(params): Query<SeriesParams>,
) -> Result<Json<Series>, ApiError>
where
  S: ObservationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let fields = Field::parse_list(params.fields.as_deref().unwrap_or_default())?;
  let series = state
    .store
    .series_for(&province, &fields)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(series))
}

// ─── Latest delta ─────────────────────────────────────────────────────────────

/// `GET /latest-delta/{province}`
pub async fn latest_delta<S>(
  State(state): State<ApiState<S>>,
  Path(province): Path<String>,
) -> Result<Json<Option<SeriesPoint>>, ApiError>
where
  S: ObservationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let point = state.store.latest_delta(&province).await.map_err(ApiError::store)?;
  Ok(Json(point))
}

// ─── Status ───────────────────────────────────────────────────────────────────

/// `GET /status`
pub async fn status<S>(State(state): State<ApiState<S>>) -> Result<Json<Option<RefreshRecord>>, ApiError>
where
  S: ObservationStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let record = state.store.last_refresh().await.map_err(ApiError::store)?;
  Ok(Json(record))
}
