//! [`SqliteStore`] is the SQLite implementation of [`ObservationStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use covidca_core::{
  metric::Field,
  observation::{Observation, ProvinceValue, RefreshRecord},
  region::REPATRIATED_TRAVELLERS_ID,
  series::{Series, SeriesPoint, build_series},
  store::ObservationStore,
};

use crate::{
  Error, Result,
  encode::{RawObservation, RawPoint, RawProvinceValue, RawRefresh, encode_dt},
  schema::{CREATE_SHADOW, INSERT_REFRESH, INSERT_SHADOW, REFRESH_HISTORY, SCHEMA, SWAP_SHADOW, TRIM_REFRESHES},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The observation cache backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. Open it once
/// at process start and [`close`](Self::close) it at shutdown.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection. Other clones fail afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) async fn refresh_count(&self) -> Result<i64> {
    let n = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM refreshes", [], |row| row.get(0))?))
      .await?;
    Ok(n)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Rows for one province ordered by date; insertion order breaks ties.
  async fn points_for(&self, province: &str, newest_first_limit: Option<i64>) -> Result<Vec<RawPoint>> {
    let province = province.to_owned();

    let raws = self
      .conn
      .call(move |conn| {
        let rows = if let Some(limit) = newest_first_limit {
          let mut stmt = conn.prepare(
            "SELECT date, numtotal, numdeaths, numtested
             FROM observations
             WHERE prname = ?1
             ORDER BY date DESC, rowid DESC
             LIMIT ?2",
          )?;
          let mut rows = stmt
            .query_map(rusqlite::params![province, limit], raw_point)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          rows.reverse();
          rows
        } else {
          let mut stmt = conn.prepare(
            "SELECT date, numtotal, numdeaths, numtested
             FROM observations
             WHERE prname = ?1
             ORDER BY date, rowid",
          )?;
          stmt
            .query_map(rusqlite::params![province], raw_point)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    Ok(raws)
  }
}

fn raw_point(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPoint> {
  Ok(RawPoint {
    date:      row.get(0)?,
    numtotal:  row.get(1)?,
    numdeaths: row.get(2)?,
    numtested: row.get(3)?,
  })
}

// ─── ObservationStore impl ───────────────────────────────────────────────────

impl ObservationStore for SqliteStore {
  type Error = Error;

  // ── Write ─────────────────────────────────────────────────────────────────

  async fn replace_all(&self, observations: Vec<Observation>, digest: String) -> Result<RefreshRecord> {
    if observations.is_empty() {
      return Err(Error::EmptyReplace);
    }

    let record = RefreshRecord {
      refreshed_at: Utc::now(),
      row_count:    observations.len() as u64,
      digest,
    };

    let raws: Vec<RawObservation> = observations.iter().map(RawObservation::from_observation).collect();
    let at_str     = encode_dt(record.refreshed_at);
    let row_count  = raws.len() as i64;
    let digest_str = record.digest.clone();

    // Readers see the old table until commit; a failure anywhere before
    // commit rolls the whole replace back.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(CREATE_SHADOW)?;
        {
          let mut stmt = tx.prepare(INSERT_SHADOW)?;
          for raw in &raws {
            stmt.execute(rusqlite::params![
              raw.pruid,
              raw.prname,
              raw.date,
              raw.numtotal,
              raw.numdeaths,
              raw.numtested,
            ])?;
          }
        }
        tx.execute_batch(SWAP_SHADOW)?;
        tx.execute(INSERT_REFRESH, rusqlite::params![at_str, row_count, digest_str])?;
        tx.execute(TRIM_REFRESHES, [REFRESH_HISTORY])?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::debug!(rows = record.row_count, digest = %record.digest, "observations replaced");
    Ok(record)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn observations(&self) -> Result<Vec<Observation>> {
    let raws: Vec<RawObservation> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT pruid, prname, date, numtotal, numdeaths, numtested
           FROM observations
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawObservation {
              pruid:     row.get(0)?,
              prname:    row.get(1)?,
              date:      row.get(2)?,
              numtotal:  row.get(3)?,
              numdeaths: row.get(4)?,
              numtested: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawObservation::into_observation).collect()
  }

  async fn provinces(&self) -> Result<Vec<String>> {
    let excluded = i64::from(REPATRIATED_TRAVELLERS_ID);

    let names = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT prname
           FROM observations
           WHERE pruid != ?1
           GROUP BY prname
           ORDER BY MIN(rowid)",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![excluded], |row| row.get::<_, String>(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(names)
  }

  async fn latest_by_province(&self, field: Field) -> Result<Vec<ProvinceValue>> {
    // The column name comes from a closed enum, never from the caller.
    let column = field.column();
    let sql = format!(
      "SELECT pruid, prname, date, {column}
       FROM (
         SELECT pruid, prname, date, {column},
                ROW_NUMBER() OVER (PARTITION BY prname ORDER BY date DESC, rowid DESC) AS rn
         FROM observations
       )
       WHERE rn = 1
       ORDER BY prname"
    );

    let raws: Vec<RawProvinceValue> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawProvinceValue {
              pruid:  row.get(0)?,
              prname: row.get(1)?,
              date:   row.get(2)?,
              value:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProvinceValue::into_province_value).collect()
  }

  async fn series_for(&self, province: &str, fields: &[Field]) -> Result<Series> {
    let rows = self
      .points_for(province, None)
      .await?
      .into_iter()
      .map(RawPoint::into_pair)
      .collect::<Result<Vec<_>>>()?;

    Ok(build_series(province, fields, rows))
  }

  async fn latest_delta(&self, province: &str) -> Result<Option<SeriesPoint>> {
    // The last point's difference only needs the row before it.
    let rows = self
      .points_for(province, Some(2))
      .await?
      .into_iter()
      .map(RawPoint::into_pair)
      .collect::<Result<Vec<_>>>()?;

    let mut series = build_series(province, &Field::ALL, rows);
    Ok(series.points.pop())
  }

  async fn last_refresh(&self) -> Result<Option<RefreshRecord>> {
    let raw: Option<RawRefresh> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT refreshed_at, row_count, digest
               FROM refreshes
               ORDER BY refresh_id DESC
               LIMIT 1",
              [],
              |row| {
                Ok(RawRefresh {
                  refreshed_at: row.get(0)?,
                  row_count:    row.get(1)?,
                  digest:       row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRefresh::into_record).transpose()
  }
}
