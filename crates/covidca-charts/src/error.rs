//! Error types for `covidca-charts`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A province in the data has no entry in the code lookup table.
  #[error(transparent)]
  Core(#[from] covidca_core::Error),

  #[error("invalid geography: {0}")]
  InvalidGeography(String),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
