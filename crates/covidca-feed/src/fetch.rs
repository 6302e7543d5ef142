//! HTTP fetch and full-table replace.

use std::time::Duration;

use covidca_core::{observation::RefreshRecord, store::ObservationStore};
use reqwest::Client;
use serde::Deserialize;

use crate::{Error, Result, digest, parse};

pub const DEFAULT_URL: &str = "https://health-infobase.canada.ca/src/data/covidLive/covid19.csv";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Where to fetch from and how long to wait.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
  pub url:                  String,
  pub connect_timeout_secs: u64,
  /// Upper bound on the whole request, body included.
  pub timeout_secs:         u64,
}

impl Default for FeedConfig {
  fn default() -> Self {
    Self {
      url:                  DEFAULT_URL.to_owned(),
      connect_timeout_secs: 10,
      timeout_secs:         60,
    }
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Result of a successful refresh.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
  pub record:  RefreshRecord,
  /// `false` when the payload digest matches the previous refresh.
  pub changed: bool,
}

// ─── Fetcher ─────────────────────────────────────────────────────────────────

/// Downloads the upstream CSV and replaces the local cache with it.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct Fetcher {
  client: Client,
  config: FeedConfig,
}

impl Fetcher {
  pub fn new(config: FeedConfig) -> Result<Self> {
    let client = Client::builder()
      .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!("covidca/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self { client, config })
  }

  pub fn url(&self) -> &str { &self.config.url }

  /// `GET` the upstream file and return its body.
  pub async fn fetch(&self) -> Result<String> {
    let resp = self.client.get(&self.config.url).send().await?;

    if !resp.status().is_success() {
      return Err(Error::Status(resp.status()));
    }
    Ok(resp.text().await?)
  }

  /// Fetch, parse, validate, and replace.
  ///
  /// On any error the store is left as it was.
  pub async fn refresh<S>(&self, store: &S) -> Result<RefreshOutcome>
  where
    S: ObservationStore,
  {
    let payload = self.fetch().await?;
    apply(store, &payload).await
  }
}

/// Parse `payload` and, only if it is valid, replace the store's content.
pub async fn apply<S>(store: &S, payload: &str) -> Result<RefreshOutcome>
where
  S: ObservationStore,
{
  let observations = parse(payload)?;
  let digest = digest(payload);

  let previous = store
    .last_refresh()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  let changed = previous.is_none_or(|p| p.digest != digest);

  let record = store
    .replace_all(observations, digest)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  tracing::info!(
    refreshed_at = %record.refreshed_at.format("%Y-%m-%d %H:%M:%S"),
    rows = record.row_count,
    digest = %record.digest,
    changed,
    "database update has completed"
  );

  Ok(RefreshOutcome { record, changed })
}
