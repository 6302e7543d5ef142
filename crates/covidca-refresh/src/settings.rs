//! Layered configuration shared by the `server` and `refresh` binaries.
//!
//! A TOML file (optional) under environment variables: `COVIDCA_PORT`,
//! `COVIDCA_FEED__TIMEOUT_SECS` and so on. `_` follows the prefix, `__`
//! separates nested keys.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::de::DeserializeOwned;

pub const ENV_PREFIX: &str = "COVIDCA";

/// The environment layer, reading the process environment.
pub fn environment() -> Environment {
  Environment::with_prefix(ENV_PREFIX).prefix_separator("_").separator("__")
}

/// Read `path` (if it exists) overlaid with `env` into `T`.
pub fn load<T: DeserializeOwned>(path: &Path, env: Environment) -> Result<T, ConfigError> {
  Config::builder()
    .add_source(File::from(path).required(false))
    .add_source(env)
    .build()?
    .try_deserialize()
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;

  use super::*;

  #[derive(Debug, Deserialize)]
  struct Sample {
    #[serde(default)]
    port: u16,
    #[serde(default)]
    feed: Feed,
  }

  #[derive(Debug, Default, Deserialize)]
  struct Feed {
    #[serde(default)]
    timeout_secs: u64,
  }

  fn env(vars: &[(&str, &str)]) -> Environment {
    let map = vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    environment().source(Some(map))
  }

  #[test]
  fn single_underscore_after_prefix() {
    let s: Sample = load(
      Path::new("/nonexistent/config.toml"),
      env(&[("COVIDCA_PORT", "9000"), ("COVIDCA_FEED__TIMEOUT_SECS", "120")]),
    )
    .unwrap();
    assert_eq!(s.port, 9000);
    assert_eq!(s.feed.timeout_secs, 120);
  }

  #[test]
  fn other_prefixes_ignored() {
    let s: Sample = load(Path::new("/nonexistent/config.toml"), env(&[("KITH_PORT", "9000")])).unwrap();
    assert_eq!(s.port, 0);
  }
}
