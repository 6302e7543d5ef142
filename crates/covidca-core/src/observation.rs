//! Observation records: one row of the upstream file.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::metric::Field;

// ─── Per-field values ────────────────────────────────────────────────────────

/// One optional value per [`Field`].
///
/// `None` means the upstream cell was empty, the field was not requested, or
/// (for differences) the value is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValues<T> {
  pub cases:  Option<T>,
  pub deaths: Option<T>,
  pub tests:  Option<T>,
}

/// All `None`, for any `T`.
impl<T> Default for FieldValues<T> {
  fn default() -> Self { Self { cases: None, deaths: None, tests: None } }
}

impl<T: Copy> FieldValues<T> {
  pub fn new(cases: Option<T>, deaths: Option<T>, tests: Option<T>) -> Self {
    Self { cases, deaths, tests }
  }

  pub fn get(&self, field: Field) -> Option<T> {
    match field {
      Field::Cases => self.cases,
      Field::Deaths => self.deaths,
      Field::Tests => self.tests,
    }
  }

  pub fn set(&mut self, field: Field, value: Option<T>) {
    match field {
      Field::Cases => self.cases = value,
      Field::Deaths => self.deaths = value,
      Field::Tests => self.tests = value,
    }
  }

  /// Keep only `fields`; everything else becomes `None`.
  pub fn only(&self, fields: &[Field]) -> Self {
    let mut out = Self::default();
    for &field in fields {
      out.set(field, self.get(field));
    }
    out
  }
}

/// Cumulative counts as published upstream.
pub type Counts = FieldValues<u64>;

// ─── Observation ─────────────────────────────────────────────────────────────

/// Cumulative counts for one province on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
  /// Upstream `pruid`. `1` is the national aggregate, `99` repatriated
  /// travellers.
  pub province_id:   u32,
  pub province_name: String,
  pub date:          NaiveDate,
  pub cumulative:    Counts,
}

// ─── Query results ───────────────────────────────────────────────────────────

/// The value of one field at a province's most recent date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceValue {
  pub province_id:   u32,
  pub province_name: String,
  pub date:          NaiveDate,
  pub value:         Option<u64>,
}

/// Bookkeeping written alongside every successful table replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRecord {
  pub refreshed_at: DateTime<Utc>,
  pub row_count:    u64,
  /// SHA-256 of the upstream payload, lowercase hex.
  pub digest:       String,
}

#[cfg(test)]
mod tests {
  use super::*;

  /// A value type with no `Default` of its own.
  #[derive(Debug, Clone, Copy, PartialEq, Eq)]
  struct Tally(u8);

  #[test]
  fn default_is_all_none_without_inner_default() {
    let empty: FieldValues<Tally> = FieldValues::default();
    assert_eq!(empty, FieldValues::new(None, None, None));
  }

  #[test]
  fn only_keeps_requested_fields() {
    let counts = Counts::new(Some(150), Some(4), Some(1300));
    let kept = counts.only(&[Field::Cases, Field::Tests]);
    assert_eq!(kept, Counts::new(Some(150), None, Some(1300)));

    let tallies = FieldValues::new(Some(Tally(1)), Some(Tally(2)), None);
    assert_eq!(tallies.only(&[Field::Deaths]), FieldValues::new(None, Some(Tally(2)), None));
  }
}
