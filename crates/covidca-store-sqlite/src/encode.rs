//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Dates are stored as ISO 8601 `YYYY-MM-DD` text so that lexical order is
//! chronological order. Timestamps are RFC 3339 strings. Counts are
//! `INTEGER`, `NULL` for empty upstream cells.

use chrono::{DateTime, NaiveDate, Utc};
use covidca_core::observation::{Counts, Observation, ProvinceValue, RefreshRecord};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Counts ──────────────────────────────────────────────────────────────────

pub fn encode_count(v: Option<u64>) -> Option<i64> { v.map(|v| i64::try_from(v).unwrap_or(i64::MAX)) }

/// Negative values cannot come from [`encode_count`]; they read back as `None`.
pub fn decode_count(v: Option<i64>) -> Option<u64> { v.and_then(|v| u64::try_from(v).ok()) }

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// An `observations` row as read from or written to SQLite.
pub struct RawObservation {
  pub pruid:     i64,
  pub prname:    String,
  pub date:      String,
  pub numtotal:  Option<i64>,
  pub numdeaths: Option<i64>,
  pub numtested: Option<i64>,
}

impl RawObservation {
  pub fn from_observation(o: &Observation) -> Self {
    Self {
      pruid:     i64::from(o.province_id),
      prname:    o.province_name.clone(),
      date:      encode_date(o.date),
      numtotal:  encode_count(o.cumulative.cases),
      numdeaths: encode_count(o.cumulative.deaths),
      numtested: encode_count(o.cumulative.tests),
    }
  }

  pub fn into_observation(self) -> Result<Observation> {
    Ok(Observation {
      province_id:   decode_province_id(self.pruid),
      province_name: self.prname,
      date:          decode_date(&self.date)?,
      cumulative:    Counts::new(
        decode_count(self.numtotal),
        decode_count(self.numdeaths),
        decode_count(self.numtested),
      ),
    })
  }
}

/// A `(date, counts)` pair of a province series.
pub struct RawPoint {
  pub date:      String,
  pub numtotal:  Option<i64>,
  pub numdeaths: Option<i64>,
  pub numtested: Option<i64>,
}

impl RawPoint {
  pub fn into_pair(self) -> Result<(NaiveDate, Counts)> {
    Ok((
      decode_date(&self.date)?,
      Counts::new(
        decode_count(self.numtotal),
        decode_count(self.numdeaths),
        decode_count(self.numtested),
      ),
    ))
  }
}

pub struct RawProvinceValue {
  pub pruid:  i64,
  pub prname: String,
  pub date:   String,
  pub value:  Option<i64>,
}

impl RawProvinceValue {
  pub fn into_province_value(self) -> Result<ProvinceValue> {
    Ok(ProvinceValue {
      province_id:   decode_province_id(self.pruid),
      province_name: self.prname,
      date:          decode_date(&self.date)?,
      value:         decode_count(self.value),
    })
  }
}

pub struct RawRefresh {
  pub refreshed_at: String,
  pub row_count:    i64,
  pub digest:       String,
}

impl RawRefresh {
  pub fn into_record(self) -> Result<RefreshRecord> {
    Ok(RefreshRecord {
      refreshed_at: decode_dt(&self.refreshed_at)?,
      row_count:    u64::try_from(self.row_count).unwrap_or(0),
      digest:       self.digest,
    })
  }
}

fn decode_province_id(v: i64) -> u32 { u32::try_from(v).unwrap_or(0) }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_is_lexically_ordered() {
    let a = encode_date(NaiveDate::from_ymd_opt(2020, 9, 30).unwrap());
    let b = encode_date(NaiveDate::from_ymd_opt(2020, 10, 1).unwrap());
    assert!(a < b);
    assert_eq!(decode_date(&b).unwrap(), NaiveDate::from_ymd_opt(2020, 10, 1).unwrap());
  }

  #[test]
  fn bad_date_is_an_error() {
    assert!(matches!(decode_date("01-10-2020"), Err(Error::DateParse(_))));
  }

  #[test]
  fn negative_count_decodes_to_none() {
    assert_eq!(decode_count(Some(-1)), None);
    assert_eq!(decode_count(Some(12)), Some(12));
    assert_eq!(encode_count(None), None);
  }
}
