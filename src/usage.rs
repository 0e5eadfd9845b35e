//! Once-per-day feature usage, persisted in SQLite.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Records which user used which feature on which day.
pub struct DailyUsage {
    conn: Mutex<Connection>,
    timezone: Tz,
}

impl DailyUsage {
    /// Open (or create) the usage database at `path`.
    pub fn open(path: &Path, timezone: Tz) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        let usage = Self { conn: Mutex::new(conn), timezone };
        usage.init_schema()?;
        info!("Opened usage database at {:?}", path);
        Ok(usage)
    }

    pub fn in_memory(timezone: Tz) -> rusqlite::Result<Self> {
        let usage = Self { conn: Mutex::new(Connection::open_in_memory()?), timezone };
        usage.init_schema()?;
        Ok(usage)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.lock().execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS feature_usage (
                user_id INTEGER NOT NULL,
                feature TEXT NOT NULL,
                day TEXT NOT NULL,
                PRIMARY KEY (user_id, feature, day)
            );
            CREATE INDEX IF NOT EXISTS idx_feature_usage_day ON feature_usage(day);
            "#,
        )
    }

    /// Today's date in the configured timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    pub fn has_used(&self, user_id: u64, feature: &str, day: NaiveDate) -> rusqlite::Result<bool> {
        let conn = self.lock();
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM feature_usage WHERE user_id = ?1 AND feature = ?2 AND day = ?3",
                params![user_id as i64, feature, day.format(DAY_FORMAT).to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Claim `feature` for `user_id` on `day`.
    ///
    /// Returns `false` if the day was already claimed. The check and the
    /// insert are one statement, so concurrent callers get exactly one `true`.
    pub fn claim(&self, user_id: u64, feature: &str, day: NaiveDate) -> rusqlite::Result<bool> {
        let inserted = self.lock().execute(
            "INSERT OR IGNORE INTO feature_usage (user_id, feature, day) VALUES (?1, ?2, ?3)",
            params![user_id as i64, feature, day.format(DAY_FORMAT).to_string()],
        )?;
        Ok(inserted == 1)
    }

    /// Give back a claim, so the feature can be used again on `day`.
    pub fn release(&self, user_id: u64, feature: &str, day: NaiveDate) -> rusqlite::Result<()> {
        self.lock().execute(
            "DELETE FROM feature_usage WHERE user_id = ?1 AND feature = ?2 AND day = ?3",
            params![user_id as i64, feature, day.format(DAY_FORMAT).to_string()],
        )?;
        Ok(())
    }

    /// Delete rows older than `day`. Returns how many were removed.
    pub fn prune_before(&self, day: NaiveDate) -> rusqlite::Result<usize> {
        self.lock().execute(
            "DELETE FROM feature_usage WHERE day < ?1",
            params![day.format(DAY_FORMAT).to_string()],
        )
    }
}
