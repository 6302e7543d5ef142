//! Error type for `covidca-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A replace with zero rows would wipe the cache; it is refused.
  #[error("refusing to replace observations with an empty set")]
  EmptyReplace,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
