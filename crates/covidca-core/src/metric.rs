//! Fields and metrics.
//!
//! A [`Field`] is one of the three cumulative counts carried by the upstream
//! file. A [`Metric`] pairs a field with a [`Mode`]: either the cumulative
//! value itself or its first difference ("new" per day).

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Field ───────────────────────────────────────────────────────────────────

/// One of the cumulative counts tracked per province and date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
  Cases,
  Deaths,
  Tests,
}

impl Field {
  pub const ALL: [Field; 3] = [Field::Cases, Field::Deaths, Field::Tests];

  /// Upstream column holding the cumulative value.
  pub fn column(self) -> &'static str {
    match self {
      Field::Cases => "numtotal",
      Field::Deaths => "numdeaths",
      Field::Tests => "numtested",
    }
  }

  /// Name of the derived first-difference series.
  pub fn new_name(self) -> &'static str {
    match self {
      Field::Cases => "newtotal",
      Field::Deaths => "newdeaths",
      Field::Tests => "newtested",
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Field::Cases => "cases",
      Field::Deaths => "deaths",
      Field::Tests => "tests",
    }
  }

  /// Parse a comma-separated list such as `cases,deaths`.
  ///
  /// An empty list yields every field. Duplicates are dropped, order is
  /// preserved.
  pub fn parse_list(s: &str) -> Result<Vec<Field>> {
    let mut fields = Vec::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
      let field: Field = part.parse()?;
      if !fields.contains(&field) {
        fields.push(field);
      }
    }
    if fields.is_empty() {
      fields.extend(Field::ALL);
    }
    Ok(fields)
  }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Field {
  type Err = Error;

  /// Accepts the short name (`cases`) or the upstream column (`numtotal`).
  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "cases" | "numtotal" => Ok(Field::Cases),
      "deaths" | "numdeaths" => Ok(Field::Deaths),
      "tests" | "numtested" => Ok(Field::Tests),
      _ => Err(Error::InvalidField(s.to_owned())),
    }
  }
}

// ─── Mode ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  /// Per-date increase, computed on read.
  New,
  /// Running total as published upstream.
  Cumulative,
}

// ─── Metric ──────────────────────────────────────────────────────────────────

/// A chartable series: a field in a given mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Metric {
  pub field: Field,
  pub mode:  Mode,
}

impl Metric {
  pub const NEW_CASES: Metric = Metric { field: Field::Cases, mode: Mode::New };
  pub const CUMULATIVE_CASES: Metric = Metric { field: Field::Cases, mode: Mode::Cumulative };
  pub const NEW_DEATHS: Metric = Metric { field: Field::Deaths, mode: Mode::New };
  pub const CUMULATIVE_DEATHS: Metric = Metric { field: Field::Deaths, mode: Mode::Cumulative };
  pub const NEW_TESTS: Metric = Metric { field: Field::Tests, mode: Mode::New };
  pub const CUMULATIVE_TESTS: Metric = Metric { field: Field::Tests, mode: Mode::Cumulative };

  /// The six dashboard tabs, in display order.
  pub const ALL: [Metric; 6] = [
    Metric::NEW_CASES,
    Metric::CUMULATIVE_CASES,
    Metric::NEW_DEATHS,
    Metric::CUMULATIVE_DEATHS,
    Metric::NEW_TESTS,
    Metric::CUMULATIVE_TESTS,
  ];

  /// Wire name, e.g. `newtotal` or `numdeaths`.
  pub fn name(self) -> &'static str {
    match self.mode {
      Mode::New => self.field.new_name(),
      Mode::Cumulative => self.field.column(),
    }
  }
}

impl fmt::Display for Metric {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Metric {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Metric::ALL
      .into_iter()
      .find(|m| m.name().eq_ignore_ascii_case(s))
      .ok_or_else(|| Error::InvalidMetric(s.to_owned()))
  }
}

impl Serialize for Metric {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(self.name())
  }
}

impl<'de> Deserialize<'de> for Metric {
  fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn metric_names_round_trip() {
    for metric in Metric::ALL {
      assert_eq!(metric.name().parse::<Metric>().unwrap(), metric);
    }
  }

  #[test]
  fn unknown_metric_is_rejected() {
    assert!(matches!("newrecovered".parse::<Metric>(), Err(Error::InvalidMetric(_))));
  }

  #[test]
  fn field_accepts_column_names() {
    assert_eq!("numtested".parse::<Field>().unwrap(), Field::Tests);
    assert_eq!("Deaths".parse::<Field>().unwrap(), Field::Deaths);
  }

  #[test]
  fn parse_list_dedupes_and_defaults() {
    assert_eq!(
      Field::parse_list("deaths, cases,deaths").unwrap(),
      vec![Field::Deaths, Field::Cases]
    );
    assert_eq!(Field::parse_list("").unwrap(), Field::ALL.to_vec());
    assert!(Field::parse_list("cases,recovered").is_err());
  }
}
