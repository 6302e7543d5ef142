//! SQL schema for the covidca SQLite store.
//!
//! Executed once at connection startup. The observation table is rebuilt on
//! every refresh through a shadow table; see [`CREATE_SHADOW`] and
//! [`SWAP_SHADOW`].

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA busy_timeout = 5000;

-- One row per province per date, as published upstream.
-- Never updated in place; replaced wholesale on refresh.
CREATE TABLE IF NOT EXISTS observations (
    pruid     INTEGER NOT NULL,
    prname    TEXT    NOT NULL,
    date      TEXT    NOT NULL,   -- ISO 8601 calendar date
    numtotal  INTEGER,            -- cumulative cases
    numdeaths INTEGER,            -- cumulative deaths
    numtested INTEGER             -- cumulative tests
);

CREATE INDEX IF NOT EXISTS observations_province_idx ON observations(prname, date);

-- One row per successful replace; only the newest REFRESH_HISTORY are kept.
CREATE TABLE IF NOT EXISTS refreshes (
    refresh_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    refreshed_at TEXT    NOT NULL,   -- RFC 3339 UTC
    row_count    INTEGER NOT NULL,
    digest       TEXT    NOT NULL    -- SHA-256 of the upstream payload
);

PRAGMA user_version = 1;
";

/// Fresh, empty shadow table. Run inside the replace transaction.
pub const CREATE_SHADOW: &str = "
DROP TABLE IF EXISTS observations_next;
CREATE TABLE observations_next (
    pruid     INTEGER NOT NULL,
    prname    TEXT    NOT NULL,
    date      TEXT    NOT NULL,
    numtotal  INTEGER,
    numdeaths INTEGER,
    numtested INTEGER
);
";

pub const INSERT_SHADOW: &str = "
INSERT INTO observations_next (pruid, prname, date, numtotal, numdeaths, numtested)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
";

/// Swap the shadow table in. Dropping the old table drops its index too.
pub const SWAP_SHADOW: &str = "
DROP TABLE observations;
ALTER TABLE observations_next RENAME TO observations;
CREATE INDEX observations_province_idx ON observations(prname, date);
";

/// Rows kept in `refreshes`.
pub const REFRESH_HISTORY: i64 = 100;

pub const INSERT_REFRESH: &str = "
INSERT INTO refreshes (refreshed_at, row_count, digest) VALUES (?1, ?2, ?3)
";

/// Drop all but the newest `?1` refresh records. Run after [`INSERT_REFRESH`]
/// in the same transaction.
pub const TRIM_REFRESHES: &str = "
DELETE FROM refreshes
WHERE refresh_id NOT IN (SELECT refresh_id FROM refreshes ORDER BY refresh_id DESC LIMIT ?1)
";
