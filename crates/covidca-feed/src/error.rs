//! Error types for the upstream feed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("upstream returned HTTP {0}")]
  Status(reqwest::StatusCode),

  #[error("upstream CSV is missing columns: {}", .0.join(", "))]
  MissingColumns(Vec<String>),

  #[error("upstream CSV has no data rows")]
  Empty,

  #[error("line {line}: invalid {column} value {value:?}")]
  InvalidValue { line: u64, column: &'static str, value: String },

  #[error("line {line}: invalid date {value:?}")]
  InvalidDate { line: u64, value: String },

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Network, timeout or HTTP status failures. Worth another try next tick.
  pub fn is_transient(&self) -> bool { matches!(self, Error::Transport(_) | Error::Status(_)) }

  /// The payload arrived but does not look like the expected dataset.
  pub fn is_schema(&self) -> bool {
    matches!(
      self,
      Error::MissingColumns(_)
        | Error::Empty
        | Error::InvalidValue { .. }
        | Error::InvalidDate { .. }
        | Error::Csv(_)
    )
  }

  /// The payload was fine; reading or writing the local store failed.
  pub fn is_store(&self) -> bool { matches!(self, Error::Store(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
