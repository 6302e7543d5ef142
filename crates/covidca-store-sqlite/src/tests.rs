//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use covidca_core::{
  metric::Field,
  observation::{Counts, Observation},
  region::{NATIONAL_AGGREGATE_NAME, ProvinceCatalog},
  store::ObservationStore,
};

use crate::{Error, SqliteStore, schema::REFRESH_HISTORY};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn obs(pruid: u32, name: &str, date: &str, cases: u64, deaths: u64, tests: Option<u64>) -> Observation {
  Observation {
    province_id:   pruid,
    province_name: name.to_owned(),
    date:          NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
    cumulative:    Counts::new(Some(cases), Some(deaths), tests),
  }
}

/// Three dates of Ontario and Quebec, the national aggregate, and
/// repatriated travellers. Deliberately not sorted by date.
fn sample() -> Vec<Observation> {
  vec![
    obs(35, "Ontario", "2021-01-01", 100, 2, Some(1000)),
    obs(24, "Quebec", "2021-01-01", 80, 1, Some(900)),
    obs(1, "Canada", "2021-01-01", 180, 3, Some(1900)),
    obs(99, "Repatriated travellers", "2021-01-01", 13, 0, None),
    obs(35, "Ontario", "2021-01-03", 190, 6, None),
    obs(24, "Quebec", "2021-01-03", 120, 4, Some(1100)),
    obs(1, "Canada", "2021-01-03", 310, 10, Some(2300)),
    obs(35, "Ontario", "2021-01-02", 150, 4, Some(1300)),
    obs(24, "Quebec", "2021-01-02", 95, 2, Some(1000)),
    obs(1, "Canada", "2021-01-02", 245, 6, Some(2300)),
  ]
}

async fn loaded() -> SqliteStore {
  let s = store().await;
  s.replace_all(sample(), "digest-1".into()).await.unwrap();
  s
}

// ─── Empty table ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_table_reads_are_empty() {
  let s = store().await;

  assert!(s.observations().await.unwrap().is_empty());
  assert!(s.provinces().await.unwrap().is_empty());
  assert!(s.latest_by_province(Field::Cases).await.unwrap().is_empty());
  assert!(s.series_for("Ontario", &Field::ALL).await.unwrap().is_empty());
  assert!(s.latest_delta("Ontario").await.unwrap().is_none());
  assert!(s.last_refresh().await.unwrap().is_none());
}

// ─── Replace ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_preserves_upstream_order() {
  let s = loaded().await;
  assert_eq!(s.observations().await.unwrap(), sample());
}

#[tokio::test]
async fn replace_is_idempotent() {
  let s = loaded().await;
  let once = s.observations().await.unwrap();

  s.replace_all(sample(), "digest-1".into()).await.unwrap();
  let twice = s.observations().await.unwrap();

  assert_eq!(once, twice);
}

#[tokio::test]
async fn replace_drops_previous_rows() {
  let s = loaded().await;
  let smaller = vec![obs(35, "Ontario", "2021-02-01", 500, 9, None)];

  s.replace_all(smaller.clone(), "digest-2".into()).await.unwrap();

  assert_eq!(s.observations().await.unwrap(), smaller);
  assert_eq!(s.provinces().await.unwrap(), vec!["Ontario".to_owned()]);
}

#[tokio::test]
async fn empty_replace_is_refused_and_keeps_data() {
  let s = loaded().await;
  let before = s.observations().await.unwrap();

  let err = s.replace_all(Vec::new(), "digest-x".into()).await.unwrap_err();
  assert!(matches!(err, Error::EmptyReplace));

  assert_eq!(s.observations().await.unwrap(), before);
  assert_eq!(s.last_refresh().await.unwrap().unwrap().digest, "digest-1");
}

#[tokio::test]
async fn last_refresh_reports_latest_replace() {
  let s = loaded().await;
  s.replace_all(vec![obs(35, "Ontario", "2021-02-01", 1, 0, None)], "digest-2".into())
    .await
    .unwrap();

  let record = s.last_refresh().await.unwrap().unwrap();
  assert_eq!(record.digest, "digest-2");
  assert_eq!(record.row_count, 1);
}

#[tokio::test]
async fn refresh_history_keeps_newest_records() {
  let s = loaded().await;
  for i in 0..REFRESH_HISTORY + 5 {
    s.replace_all(vec![obs(35, "Ontario", "2021-02-01", i as u64, 0, None)], format!("digest-{i}"))
      .await
      .unwrap();
  }

  assert_eq!(s.refresh_count().await.unwrap(), REFRESH_HISTORY);
  let last = s.last_refresh().await.unwrap().unwrap();
  assert_eq!(last.digest, format!("digest-{}", REFRESH_HISTORY + 4));
}

// ─── Provinces ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn every_upstream_province_has_a_code() {
  let names = [
    (10, "Newfoundland and Labrador"),
    (11, "Prince Edward Island"),
    (12, "Nova Scotia"),
    (13, "New Brunswick"),
    (24, "Quebec"),
    (35, "Ontario"),
    (46, "Manitoba"),
    (47, "Saskatchewan"),
    (48, "Alberta"),
    (59, "British Columbia"),
    (60, "Yukon"),
    (61, "Northwest Territories"),
    (62, "Nunavut"),
    (1, "Canada"),
    (99, "Repatriated travellers"),
  ];
  let rows = names
    .iter()
    .map(|(pruid, name)| obs(*pruid, name, "2021-01-01", 1, 0, None))
    .collect();
  let s = store().await;
  s.replace_all(rows, "digest-1".into()).await.unwrap();

  let catalog = ProvinceCatalog::default();
  let provinces: Vec<String> = s
    .provinces()
    .await
    .unwrap()
    .into_iter()
    .filter(|p| p != NATIONAL_AGGREGATE_NAME)
    .collect();
  assert_eq!(provinces.len(), 13);
  for name in &provinces {
    assert!(catalog.require_code(name).is_ok(), "{name}");
  }
}

#[tokio::test]
async fn provinces_exclude_repatriated_in_first_appearance_order() {
  let s = loaded().await;
  assert_eq!(
    s.provinces().await.unwrap(),
    vec!["Ontario".to_owned(), "Quebec".to_owned(), "Canada".to_owned()]
  );
}

// ─── Latest by province ──────────────────────────────────────────────────────

#[tokio::test]
async fn latest_by_province_uses_most_recent_date() {
  let s = loaded().await;
  let latest = s.latest_by_province(Field::Cases).await.unwrap();

  let names: Vec<&str> = latest.iter().map(|v| v.province_name.as_str()).collect();
  assert_eq!(names, ["Canada", "Ontario", "Quebec", "Repatriated travellers"]);

  let ontario = latest.iter().find(|v| v.province_name == "Ontario").unwrap();
  assert_eq!(ontario.value, Some(190));
  assert_eq!(ontario.date, NaiveDate::from_ymd_opt(2021, 1, 3).unwrap());
}

#[tokio::test]
async fn latest_by_province_keeps_missing_values() {
  let s = loaded().await;
  let latest = s.latest_by_province(Field::Tests).await.unwrap();
  let ontario = latest.iter().find(|v| v.province_name == "Ontario").unwrap();
  assert_eq!(ontario.value, None);
}

#[tokio::test]
async fn latest_by_province_duplicate_date_takes_last_row() {
  let s = store().await;
  s.replace_all(
    vec![
      obs(35, "Ontario", "2021-01-01", 100, 0, None),
      obs(35, "Ontario", "2021-01-01", 105, 0, None),
    ],
    "d".into(),
  )
  .await
  .unwrap();

  let latest = s.latest_by_province(Field::Cases).await.unwrap();
  assert_eq!(latest.len(), 1);
  assert_eq!(latest[0].value, Some(105));
}

// ─── Series ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn series_is_date_ordered_with_aligned_differences() {
  let s = loaded().await;
  let series = s.series_for("Ontario", &[Field::Cases, Field::Tests]).await.unwrap();

  let dates: Vec<String> = series.points.iter().map(|p| p.date.to_string()).collect();
  assert_eq!(dates, ["2021-01-01", "2021-01-02", "2021-01-03"]);

  let new_cases: Vec<Option<i64>> = series.points.iter().map(|p| p.new.cases).collect();
  assert_eq!(new_cases, [None, Some(50), Some(40)]);

  let new_tests: Vec<Option<i64>> = series.points.iter().map(|p| p.new.tests).collect();
  assert_eq!(new_tests, [None, Some(300), None]);

  // Deaths were not requested.
  assert!(series.points.iter().all(|p| p.cumulative.deaths.is_none() && p.new.deaths.is_none()));
}

#[tokio::test]
async fn unknown_province_series_is_empty() {
  let s = loaded().await;
  let series = s.series_for("Atlantis", &Field::ALL).await.unwrap();
  assert!(series.is_empty());
  assert_eq!(series.province, "Atlantis");
}

#[tokio::test]
async fn province_name_is_bound_not_spliced() {
  let s = loaded().await;
  let series = s.series_for("x' OR '1'='1", &Field::ALL).await.unwrap();
  assert!(series.is_empty());
}

// ─── Latest delta ────────────────────────────────────────────────────────────

#[tokio::test]
async fn latest_delta_two_rows() {
  let s = store().await;
  s.replace_all(
    vec![
      obs(35, "ON", "2021-01-01", 100, 0, None),
      obs(35, "ON", "2021-01-02", 150, 0, None),
    ],
    "d".into(),
  )
  .await
  .unwrap();

  let point = s.latest_delta("ON").await.unwrap().unwrap();
  assert_eq!(point.cumulative.cases, Some(150));
  assert_eq!(point.new.cases, Some(50));
}

#[tokio::test]
async fn latest_delta_matches_last_series_point() {
  let s = loaded().await;
  for province in ["Ontario", "Quebec", "Canada"] {
    let series = s.series_for(province, &Field::ALL).await.unwrap();
    let delta = s.latest_delta(province).await.unwrap();
    assert_eq!(delta.as_ref(), series.latest(), "{province}");
  }
}

#[tokio::test]
async fn latest_delta_single_row_has_undefined_difference() {
  let s = loaded().await;
  let point = s.latest_delta("Repatriated travellers").await.unwrap().unwrap();
  assert_eq!(point.cumulative.cases, Some(13));
  assert_eq!(point.new.cases, None);
}

#[tokio::test]
async fn latest_delta_unknown_province_is_none() {
  let s = loaded().await;
  assert!(s.latest_delta("Atlantis").await.unwrap().is_none());
}

// ─── On disk ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn second_handle_sees_replace() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("covid.db");

  let writer = SqliteStore::open(&path).await.unwrap();
  let reader = SqliteStore::open(&path).await.unwrap();

  writer.replace_all(sample(), "digest-1".into()).await.unwrap();
  assert_eq!(reader.observations().await.unwrap(), sample());

  writer.close().await.unwrap();
  reader.close().await.unwrap();
}
