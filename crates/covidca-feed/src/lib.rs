//! Upstream dataset feed for covidca.
//!
//! Parses the Public Health Agency of Canada `covid19.csv` snapshot into
//! [`Observation`]s and replaces the local cache with it. The codec
//! ([`parse`], [`digest`]) is pure and synchronous; [`Fetcher`] adds the HTTP
//! side.
//!
//! # Quick start
//!
//! ```no_run
//! let csv = "pruid,prname,date,numtotal,numdeaths,numtested\n35,Ontario,01-02-2021,100,2,1000\n";
//! let rows = covidca_feed::parse(csv).unwrap();
//! assert_eq!(rows[0].province_name, "Ontario");
//! ```

pub mod error;
mod fetch;
mod parse;

use covidca_core::observation::Observation;
use sha2::{Digest, Sha256};

pub use error::{Error, Result};
pub use fetch::{DEFAULT_URL, FeedConfig, Fetcher, RefreshOutcome, apply};
pub use parse::REQUIRED_COLUMNS;

/// Parse and validate an upstream payload.
///
/// Fails if a required column is missing, if any row is malformed, or if the
/// payload has no data rows.
pub fn parse(input: &str) -> Result<Vec<Observation>> { parse::parse_csv(input) }

/// SHA-256 of `payload`, lowercase hex.
pub fn digest(payload: &str) -> String { hex::encode(Sha256::digest(payload.as_bytes())) }
