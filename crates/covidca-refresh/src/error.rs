//! Schedule configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid schedule: {0}")]
  InvalidSchedule(String),

  #[error("invalid time of day {0:?}, expected HH:MM")]
  InvalidTime(String),

  #[error("unknown time zone: {0}")]
  UnknownTimezone(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
