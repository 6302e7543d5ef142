//! Error types for `covidca-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown metric: {0:?}")]
  InvalidMetric(String),

  #[error("unknown field: {0:?}")]
  InvalidField(String),

  #[error("no two-letter code configured for province {0:?}")]
  UnknownProvinceCode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
