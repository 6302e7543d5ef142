//! Periodic refresh of the local observation cache.
//!
//! A [`Cadence`] says when to fire; [`run`] loops until told to stop,
//! refreshing the store through a [`covidca_feed::Fetcher`] at each fire time.
//! The `refresh` binary wraps this for standalone use; the server can run the
//! same loop in-process.

pub mod error;
pub mod runner;
pub mod schedule;
pub mod settings;

pub use error::{Error, Result};
pub use runner::{refresh_once, run};
pub use schedule::{Cadence, DEFAULT_INTERVAL_SECS, DEFAULT_TIMEZONE, ScheduleConfig};
