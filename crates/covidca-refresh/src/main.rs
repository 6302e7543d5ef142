//! covidca refresh binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! cache and keeps it in sync with the upstream CSV until Ctrl-C. With
//! `--once` it refreshes a single time and exits non-zero on failure.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use covidca_feed::{FeedConfig, Fetcher};
use covidca_refresh::{ScheduleConfig, refresh_once, settings};
use covidca_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::sync::watch;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Refresh the covidca observation cache")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Refresh once and exit.
  #[arg(long)]
  once: bool,
}

#[derive(Debug, Deserialize)]
struct RefreshConfig {
  #[serde(default = "default_store_path")]
  store_path: PathBuf,
  #[serde(default)]
  feed:       FeedConfig,
  #[serde(default)]
  schedule:   ScheduleConfig,
}

fn default_store_path() -> PathBuf { PathBuf::from("covidca.db") }

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg: RefreshConfig = settings::load(&cli.config, settings::environment())
    .context("failed to load refresh config")?;

  let cadence = cfg.schedule.cadence().context("invalid [schedule]")?;
  let fetcher = Fetcher::new(cfg.feed).context("failed to build HTTP client")?;

  let store_path = expand_tilde(&cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if cli.once {
    let result = refresh_once(&fetcher, &store).await;
    store.close().await.context("failed to close store")?;
    result.context("refresh failed")?;
    return Ok(());
  }

  tracing::info!(url = fetcher.url(), ?cadence, "refresh scheduler started");
  let (shutdown_tx, shutdown_rx) = watch::channel(false);
  let task = tokio::spawn(covidca_refresh::run(
    fetcher,
    Arc::new(store.clone()),
    cadence,
    cfg.schedule.run_on_start,
    shutdown_rx,
  ));

  tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
  tracing::info!("shutting down");
  shutdown_tx.send_replace(true);
  task.await.context("refresh task panicked")?;

  store.close().await.context("failed to close store")?;
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
