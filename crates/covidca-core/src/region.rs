//! Province names, two-letter codes, and pseudo-regions.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// `pruid` of the national aggregate row ("Canada").
pub const NATIONAL_AGGREGATE_ID: u32 = 1;

/// `pruid` of the "Repatriated travellers" pseudo-region.
pub const REPATRIATED_TRAVELLERS_ID: u32 = 99;

pub const NATIONAL_AGGREGATE_NAME: &str = "Canada";
pub const REPATRIATED_TRAVELLERS_NAME: &str = "Repatriated travellers";

/// `true` for rows that are not an actual province or territory.
pub fn is_pseudo_region(province_id: u32) -> bool {
  province_id == NATIONAL_AGGREGATE_ID || province_id == REPATRIATED_TRAVELLERS_ID
}

/// One entry of the lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceCode {
  pub name: String,
  pub code: String,
}

/// Full province name to postal code lookup.
///
/// Plain configuration: build it once, pass it where it is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProvinceCatalog {
  entries: Vec<ProvinceCode>,
}

impl ProvinceCatalog {
  pub fn new(entries: Vec<ProvinceCode>) -> Self { Self { entries } }

  pub fn entries(&self) -> &[ProvinceCode] { &self.entries }

  pub fn code(&self, name: &str) -> Option<&str> {
    self
      .entries
      .iter()
      .find(|e| e.name == name)
      .map(|e| e.code.as_str())
  }

  /// Like [`code`](Self::code), but a missing entry is an error: the catalog
  /// is expected to cover every real province the upstream file carries.
  pub fn require_code(&self, name: &str) -> Result<&str> {
    self
      .code(name)
      .ok_or_else(|| Error::UnknownProvinceCode(name.to_owned()))
  }

  pub fn name_for_code(&self, code: &str) -> Option<&str> {
    self
      .entries
      .iter()
      .find(|e| e.code.eq_ignore_ascii_case(code))
      .map(|e| e.name.as_str())
  }
}

impl Default for ProvinceCatalog {
  fn default() -> Self {
    const TABLE: [(&str, &str); 13] = [
      ("Newfoundland and Labrador", "NL"),
      ("Prince Edward Island", "PE"),
      ("Nova Scotia", "NS"),
      ("New Brunswick", "NB"),
      ("Quebec", "QC"),
      ("Ontario", "ON"),
      ("Manitoba", "MB"),
      ("Saskatchewan", "SK"),
      ("Alberta", "AB"),
      ("British Columbia", "BC"),
      ("Yukon", "YT"),
      ("Northwest Territories", "NT"),
      ("Nunavut", "NU"),
    ];
    Self::new(
      TABLE
        .iter()
        .map(|(name, code)| ProvinceCode { name: (*name).to_owned(), code: (*code).to_owned() })
        .collect(),
    )
  }
}
