//! covidca server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite cache, and serves the dashboard API over HTTP until Ctrl-C.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use covidca_refresh::settings;
use covidca_server::ServerConfig;
use covidca_store_sqlite::SqliteStore;
use tokio::{net::TcpListener, sync::watch};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "covidca dashboard server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let mut server_cfg: ServerConfig = settings::load(&cli.config, settings::environment())
    .context("failed to load ServerConfig")?;

  server_cfg.store_path = expand_tilde(&server_cfg.store_path);
  server_cfg.geography_path = server_cfg.geography_path.as_deref().map(expand_tilde);

  // Open SQLite store.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;
  let shared = Arc::new(store.clone());

  let state = covidca_server::build_state(&server_cfg, Arc::clone(&shared))?;

  let (shutdown_tx, shutdown_rx) = watch::channel(false);
  let refresh = covidca_server::spawn_embedded_refresh(&server_cfg, shared, shutdown_rx)?;

  let app = covidca_server::app(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(async {
      if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
      }
      tracing::info!("shutting down");
    })
    .await
    .context("server error")?;

  shutdown_tx.send_replace(true);
  if let Some(task) = refresh {
    task.await.context("refresh task panicked")?;
  }

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
