//! Upstream CSV parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ csv::Reader            → header + records
//!          └─ Columns::locate() → index of each required column
//!               └─ Columns::observation() per record → Vec<Observation>
//!
//! Any bad cell rejects the whole payload; a partial dataset must never reach
//! the store.

use chrono::NaiveDate;
use covidca_core::observation::{Counts, Observation};
use csv::StringRecord;

use crate::error::{Error, Result};

/// Columns the upstream file must carry. Everything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 6] = ["pruid", "prname", "date", "numtotal", "numdeaths", "numtested"];

/// Accepted date layouts, tried in order. The feed publishes `dd-mm-yyyy`;
/// later snapshots switched to ISO.
const DATE_FORMATS: [&str; 2] = ["%d-%m-%Y", "%Y-%m-%d"];

// ─── Column lookup ───────────────────────────────────────────────────────────

struct Columns {
  pruid:     usize,
  prname:    usize,
  date:      usize,
  numtotal:  usize,
  numdeaths: usize,
  numtested: usize,
}

impl Columns {
  /// Locate every required column, reporting all missing ones at once.
  fn locate(headers: &StringRecord) -> Result<Self> {
    let names: Vec<String> = headers
      .iter()
      .map(|h| h.trim_start_matches('\u{feff}').trim().to_ascii_lowercase())
      .collect();

    let mut missing = Vec::new();
    let mut found = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, column) in found.iter_mut().zip(REQUIRED_COLUMNS) {
      match names.iter().position(|n| n == column) {
        Some(i) => *slot = i,
        None => missing.push(column.to_owned()),
      }
    }
    if !missing.is_empty() {
      return Err(Error::MissingColumns(missing));
    }

    let [pruid, prname, date, numtotal, numdeaths, numtested] = found;
    Ok(Self { pruid, prname, date, numtotal, numdeaths, numtested })
  }

  fn observation(&self, record: &StringRecord, line: u64) -> Result<Observation> {
    let cell = |i: usize| record.get(i).unwrap_or("").trim();

    let pruid_str = cell(self.pruid);
    let province_id = pruid_str.parse::<u32>().map_err(|_| Error::InvalidValue {
      line,
      column: "pruid",
      value: pruid_str.to_owned(),
    })?;

    let province_name = cell(self.prname);
    if province_name.is_empty() {
      return Err(Error::InvalidValue { line, column: "prname", value: String::new() });
    }

    Ok(Observation {
      province_id,
      province_name: province_name.to_owned(),
      date: parse_date(cell(self.date), line)?,
      cumulative: Counts::new(
        parse_count(cell(self.numtotal), "numtotal", line)?,
        parse_count(cell(self.numdeaths), "numdeaths", line)?,
        parse_count(cell(self.numtested), "numtested", line)?,
      ),
    })
  }
}

// ─── Cell parsers ────────────────────────────────────────────────────────────

fn parse_date(s: &str, line: u64) -> Result<NaiveDate> {
  DATE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    .ok_or_else(|| Error::InvalidDate { line, value: s.to_owned() })
}

/// Empty cells are missing values. Whole-valued floats (`12.0`) are accepted
/// because some snapshots were exported that way.
fn parse_count(s: &str, column: &'static str, line: u64) -> Result<Option<u64>> {
  if s.is_empty() {
    return Ok(None);
  }
  if let Ok(v) = s.parse::<u64>() {
    return Ok(Some(v));
  }
  match s.parse::<f64>() {
    Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => Ok(Some(v as u64)),
    _ => Err(Error::InvalidValue { line, column, value: s.to_owned() }),
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

pub(crate) fn parse_csv(input: &str) -> Result<Vec<Observation>> {
  let mut reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .from_reader(input.as_bytes());

  let columns = Columns::locate(reader.headers()?)?;

  let mut observations = Vec::new();
  for (i, record) in reader.records().enumerate() {
    let record = record?;
    let line = record.position().map_or(i as u64 + 2, |p| p.line());
    observations.push(columns.observation(&record, line)?);
  }

  if observations.is_empty() {
    return Err(Error::Empty);
  }
  Ok(observations)
}
