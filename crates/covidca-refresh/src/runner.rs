//! The refresh loop.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use covidca_core::store::ObservationStore;
use covidca_feed::{Fetcher, RefreshOutcome};
use tokio::sync::watch;

use crate::schedule::Cadence;

/// Refresh once, logging the outcome.
///
/// Transient failures (network, HTTP status) log at `warn`. A rejected
/// payload and a failed store update log at `error`, each with its own
/// message. The store content is untouched on failure.
pub async fn refresh_once<S>(fetcher: &Fetcher, store: &S) -> covidca_feed::Result<RefreshOutcome>
where
  S: ObservationStore,
{
  let result = fetcher.refresh(store).await;
  if let Err(e) = &result {
    if e.is_transient() {
      tracing::warn!(url = fetcher.url(), error = %e, "refresh failed, keeping previous data");
    } else if e.is_store() {
      tracing::error!(error = %e, "store update failed, keeping previous data");
    } else {
      tracing::error!(url = fetcher.url(), error = %e, "refresh rejected, keeping previous data");
    }
  }
  result
}

/// Refresh `store` on `cadence` until `shutdown` turns `true` or its sender
/// is dropped.
///
/// A refresh in progress is always allowed to finish; shutdown is only
/// observed while waiting for the next fire time. Failures never end the loop.
pub async fn run<S>(
  fetcher: Fetcher,
  store: Arc<S>,
  cadence: Cadence,
  run_on_start: bool,
  mut shutdown: watch::Receiver<bool>,
) where
  S: ObservationStore,
{
  if *shutdown.borrow() {
    return;
  }
  if run_on_start {
    let _ = refresh_once(&fetcher, store.as_ref()).await;
  }

  loop {
    let now = Utc::now();
    let next = cadence.next_after(now);
    let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
    tracing::debug!(next = %next, "next refresh scheduled");

    tokio::select! {
      biased;
      changed = shutdown.changed() => {
        if changed.is_err() || *shutdown.borrow() {
          break;
        }
      }
      _ = tokio::time::sleep(wait) => {
        let _ = refresh_once(&fetcher, store.as_ref()).await;
      }
    }
  }

  tracing::info!("refresh scheduler stopped");
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use axum::{Router, http::StatusCode, routing::get};
  use covidca_feed::FeedConfig;
  use covidca_store_sqlite::SqliteStore;
  use tokio::net::TcpListener;

  use super::*;

  const GOOD: &str = "\
pruid,prname,date,numtotal,numdeaths,numtested
35,Ontario,01-01-2021,100,2,1000
35,Ontario,02-01-2021,150,3,1200
";

  /// Serves 503 for the first `failures` requests, then `GOOD`.
  async fn serve(failures: usize) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let app = Router::new().route(
      "/covid19.csv",
      get(move || {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        async move {
          if n < failures { (StatusCode::SERVICE_UNAVAILABLE, "down") } else { (StatusCode::OK, GOOD) }
        }
      }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/covid19.csv"), hits)
  }

  fn fetcher(url: String) -> Fetcher {
    Fetcher::new(FeedConfig { url, connect_timeout_secs: 2, timeout_secs: 5 }).unwrap()
  }

  async fn wait_for_refresh(store: &SqliteStore) {
    for _ in 0..200 {
      if store.last_refresh().await.unwrap().is_some() {
        return;
      }
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("store was never refreshed");
  }

  #[tokio::test]
  async fn run_on_start_refreshes_then_stops_on_shutdown() {
    let (url, hits) = serve(0).await;
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let (tx, rx) = watch::channel(false);

    let task = tokio::spawn(run(
      fetcher(url),
      Arc::clone(&store),
      Cadence::Interval(Duration::from_secs(3600)),
      true,
      rx,
    ));
    wait_for_refresh(&store).await;
    tx.send(true).unwrap();

    tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(store.provinces().await.unwrap(), ["Ontario"]);
  }

  #[tokio::test]
  async fn failures_do_not_stop_the_loop() {
    let (url, hits) = serve(2).await;
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let (tx, rx) = watch::channel(false);

    let task = tokio::spawn(run(
      fetcher(url),
      Arc::clone(&store),
      Cadence::Interval(Duration::from_millis(20)),
      false,
      rx,
    ));
    wait_for_refresh(&store).await;
    drop(tx);

    tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
    assert!(hits.load(Ordering::SeqCst) >= 3);
  }

  #[tokio::test]
  async fn already_shut_down_never_fetches() {
    let (url, hits) = serve(0).await;
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let (_tx, rx) = watch::channel(true);

    run(fetcher(url), store, Cadence::Interval(Duration::from_millis(1)), true, rx).await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn refresh_once_surfaces_the_error() {
    let (url, _) = serve(1).await;
    let store = SqliteStore::open_in_memory().await.unwrap();

    let err = refresh_once(&fetcher(url), &store).await.unwrap_err();
    assert!(err.is_transient());
    assert!(store.last_refresh().await.unwrap().is_none());
  }

  #[tokio::test]
  async fn closed_store_is_a_store_failure() {
    let (url, hits) = serve(0).await;
    let store = SqliteStore::open_in_memory().await.unwrap();
    store.clone().close().await.unwrap();

    let err = refresh_once(&fetcher(url), &store).await.unwrap_err();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(err.is_store());
    assert!(!err.is_transient());
    assert!(!err.is_schema());
  }
}
