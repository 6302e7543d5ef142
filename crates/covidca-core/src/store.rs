//! The `ObservationStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `covidca-store-sqlite`).
//! The fetcher, the API and the scheduler depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::{
  metric::Field,
  observation::{Observation, ProvinceValue, RefreshRecord},
  series::{Series, SeriesPoint},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the local cache of the upstream dataset.
///
/// [`replace_all`](Self::replace_all) is the only write. Every other method is
/// a read; none of them fail for an unknown province or an empty table, they
/// return empty results instead.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ObservationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Write ─────────────────────────────────────────────────────────────

  /// Replace the whole table with `observations` and record the refresh.
  ///
  /// All-or-nothing: on error the previous content is left untouched.
  /// Rejects an empty `observations`.
  fn replace_all(
    &self,
    observations: Vec<Observation>,
    digest: String,
  ) -> impl Future<Output = Result<RefreshRecord, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Every stored row, in upstream order.
  fn observations(&self) -> impl Future<Output = Result<Vec<Observation>, Self::Error>> + Send + '_;

  /// Distinct province names, repatriated travellers excluded, in order of
  /// first appearance upstream. The national aggregate is included.
  fn provinces(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// For each province, `field` at its most recent date. Ordered by name.
  fn latest_by_province(
    &self,
    field: Field,
  ) -> impl Future<Output = Result<Vec<ProvinceValue>, Self::Error>> + Send + '_;

  /// Date-ordered cumulative values for `province` with aligned first
  /// differences, restricted to `fields`.
  fn series_for<'a>(
    &'a self,
    province: &'a str,
    fields: &'a [Field],
  ) -> impl Future<Output = Result<Series, Self::Error>> + Send + 'a;

  /// The most recent point of the three-field series for `province`.
  fn latest_delta<'a>(
    &'a self,
    province: &'a str,
  ) -> impl Future<Output = Result<Option<SeriesPoint>, Self::Error>> + Send + 'a;

  /// The last successful refresh, if any.
  fn last_refresh(&self) -> impl Future<Output = Result<Option<RefreshRecord>, Self::Error>> + Send + '_;
}
