//! When to refresh.

use std::time::Duration;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone as _, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Two hours.
pub const DEFAULT_INTERVAL_SECS: u64 = 2 * 60 * 60;
pub const DEFAULT_TIMEZONE: &str = "America/Toronto";

// ─── Cadence ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Cadence {
  /// Fixed spacing between fire times.
  Interval(Duration),
  /// Fixed wall-clock times in `tz`, every day.
  Daily { times: Vec<NaiveTime>, tz: Tz },
  /// Whichever member fires first.
  Any(Vec<Cadence>),
}

impl Cadence {
  /// The first fire time strictly after `now`.
  ///
  /// A daily time that falls in a DST gap fires at the first valid local
  /// minute after it. A time that occurs twice fires at the earlier instant
  /// only.
  pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
    match self {
      Cadence::Interval(every) => TimeDelta::from_std(*every)
        .ok()
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC),
      Cadence::Daily { times, tz } => {
        let today = now.with_timezone(tz).date_naive();
        (0..=2)
          .filter_map(|offset| today.checked_add_days(Days::new(offset)))
          .find_map(|day| {
            times
              .iter()
              .filter_map(|t| resolve_local(tz, day, *t))
              .filter(|fire| *fire > now)
              .min()
          })
          .unwrap_or(now + TimeDelta::days(1))
      }
      Cadence::Any(members) => members
        .iter()
        .map(|c| c.next_after(now))
        .min()
        .unwrap_or(now + TimeDelta::days(1)),
    }
  }
}

/// `day` at `time` in `tz`, as UTC.
fn resolve_local(tz: &Tz, day: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
  let naive = day.and_time(time);
  (0..=24 * 60)
    .find_map(|m| tz.from_local_datetime(&(naive + TimeDelta::minutes(m))).earliest())
    .map(|dt| dt.with_timezone(&Utc))
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// The `[schedule]` table.
///
/// With neither `interval_secs` nor `daily` set, the cadence is every
/// [`DEFAULT_INTERVAL_SECS`]. With both, whichever comes first fires.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
  pub interval_secs: Option<u64>,
  /// Local wall-clock times, `HH:MM`.
  pub daily:         Vec<String>,
  pub timezone:      String,
  /// Refresh once immediately instead of waiting for the first fire time.
  pub run_on_start:  bool,
}

impl Default for ScheduleConfig {
  fn default() -> Self {
    Self {
      interval_secs: None,
      daily:         Vec::new(),
      timezone:      DEFAULT_TIMEZONE.to_owned(),
      run_on_start:  true,
    }
  }
}

impl ScheduleConfig {
  /// Validate and build the cadence.
  pub fn cadence(&self) -> Result<Cadence> {
    let interval = match self.interval_secs {
      Some(0) => return Err(Error::InvalidSchedule("interval_secs must be positive".to_owned())),
      Some(secs) => Some(Cadence::Interval(Duration::from_secs(secs))),
      None => None,
    };
    if self.daily.is_empty() {
      return Ok(interval.unwrap_or(Cadence::Interval(Duration::from_secs(DEFAULT_INTERVAL_SECS))));
    }

    let tz: Tz = self
      .timezone
      .parse()
      .map_err(|_| Error::UnknownTimezone(self.timezone.clone()))?;
    let mut times = self
      .daily
      .iter()
      .map(|s| NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| Error::InvalidTime(s.clone())))
      .collect::<Result<Vec<_>>>()?;
    times.sort();
    times.dedup();
    let daily = Cadence::Daily { times, tz };

    Ok(match interval {
      Some(interval) => Cadence::Any(vec![interval, daily]),
      None => daily,
    })
  }
}
