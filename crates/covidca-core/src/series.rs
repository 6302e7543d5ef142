//! Date-ordered series with derived first differences.
//!
//! "New" values are never stored. They are computed here, on read, from the
//! cumulative values of a single province ordered by date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  metric::{Field, Metric, Mode},
  observation::{Counts, FieldValues},
};

/// One date of a province series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
  pub date:       NaiveDate,
  pub cumulative: Counts,
  /// First difference against the previous point; `None` on the first point.
  pub new:        FieldValues<i64>,
}

impl SeriesPoint {
  /// Value of `metric` at this point, widened to `i64`.
  pub fn value(&self, metric: Metric) -> Option<i64> {
    match metric.mode {
      Mode::New => self.new.get(metric.field),
      Mode::Cumulative => self.cumulative.get(metric.field).map(to_i64),
    }
  }
}

/// A province series restricted to the requested fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
  pub province: String,
  pub fields:   Vec<Field>,
  pub points:   Vec<SeriesPoint>,
}

impl Series {
  pub fn is_empty(&self) -> bool { self.points.is_empty() }

  pub fn latest(&self) -> Option<&SeriesPoint> { self.points.last() }
}

/// First difference of a cumulative series.
///
/// The output has the same length as the input. The first element is always
/// `None`; element `i` is `values[i] - values[i - 1]` when both are present.
/// Negative differences (upstream corrections) are kept as-is.
pub fn first_difference(values: &[Option<u64>]) -> Vec<Option<i64>> {
  let mut out = Vec::with_capacity(values.len());
  let mut previous: Option<Option<u64>> = None;
  for &current in values {
    let delta = match (previous, current) {
      (Some(Some(prev)), Some(cur)) => Some(to_i64(cur) - to_i64(prev)),
      _ => None,
    };
    out.push(delta);
    previous = Some(current);
  }
  out
}

/// Assemble a [`Series`] from rows already ordered by date.
pub fn build_series(
  province: impl Into<String>,
  fields:   &[Field],
  rows:     Vec<(NaiveDate, Counts)>,
) -> Series {
  let mut new_values: Vec<FieldValues<i64>> = vec![FieldValues::default(); rows.len()];
  for &field in fields {
    let column: Vec<Option<u64>> = rows.iter().map(|(_, c)| c.get(field)).collect();
    for (slot, delta) in new_values.iter_mut().zip(first_difference(&column)) {
      slot.set(field, delta);
    }
  }

  let points = rows
    .into_iter()
    .zip(new_values)
    .map(|((date, counts), new)| SeriesPoint {
      date,
      cumulative: counts.only(fields),
      new,
    })
    .collect();

  Series { province: province.into(), fields: fields.to_vec(), points }
}

fn to_i64(v: u64) -> i64 { i64::try_from(v).unwrap_or(i64::MAX) }
