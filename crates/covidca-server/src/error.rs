//! Start-up errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to load geography from {path:?}: {source}")]
  Geography {
    path:   PathBuf,
    #[source]
    source: covidca_charts::Error,
  },

  #[error("invalid schedule: {0}")]
  Schedule(#[from] covidca_refresh::Error),

  #[error("feed client: {0}")]
  Feed(#[from] covidca_feed::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
