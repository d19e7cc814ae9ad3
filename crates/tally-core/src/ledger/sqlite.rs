//! SQLite-backed ledger storage.
//!
//! One row per (subject, category, day) bucket, one per (subject, category)
//! running total, one per (subject, day) visit. Increments are upserts
//! executed inside a transaction, so concurrent writers for the same
//! subject cannot lose updates.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

use crate::config::data_dir;
use crate::error::LedgerError;
use crate::model::{ActivitySnapshot, EventCategory, SubjectId};

use super::Backend;

/// SQLite [`Backend`].
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Open the ledger database at `~/.config/tally/tally.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns [`LedgerError::BackendUnavailable`] if the database cannot
    /// be opened or migrated.
    pub fn open_default() -> Result<Self, LedgerError> {
        let dir = data_dir().map_err(|e| LedgerError::BackendUnavailable(e.to_string()))?;
        Self::open(&dir.join("tally.db"))
    }

    /// Open the ledger database at `path`.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let conn = Connection::open(path)
            .map_err(|e| LedgerError::BackendUnavailable(e.to_string()))?;
        let backend = Self {
            conn: Mutex::new(conn),
        };
        backend.migrate()?;
        Ok(backend)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, LedgerError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| LedgerError::BackendUnavailable(e.to_string()))?;
        let backend = Self {
            conn: Mutex::new(conn),
        };
        backend.migrate()?;
        Ok(backend)
    }

    fn migrate(&self) -> Result<(), LedgerError> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS daily_counts (
                subject  TEXT NOT NULL,
                category TEXT NOT NULL,
                day      TEXT NOT NULL,
                count    INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (subject, category, day)
            );

            CREATE TABLE IF NOT EXISTS running_totals (
                subject  TEXT NOT NULL,
                category TEXT NOT NULL,
                total    INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (subject, category)
            );

            CREATE TABLE IF NOT EXISTS visit_days (
                subject TEXT NOT NULL,
                day     TEXT NOT NULL,
                PRIMARY KEY (subject, day)
            );",
        )?;
        Ok(())
    }
}

impl Backend for SqliteBackend {
    fn increment(
        &self,
        subject: &SubjectId,
        category: EventCategory,
        day: NaiveDate,
    ) -> Result<(), LedgerError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO daily_counts (subject, category, day, count) VALUES (?1, ?2, ?3, 1)
             ON CONFLICT(subject, category, day) DO UPDATE SET count = count + 1",
            params![subject.as_str(), category.as_str(), day.to_string()],
        )?;
        tx.execute(
            "INSERT INTO running_totals (subject, category, total) VALUES (?1, ?2, 1)
             ON CONFLICT(subject, category) DO UPDATE SET total = total + 1",
            params![subject.as_str(), category.as_str()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn insert_visit(&self, subject: &SubjectId, day: NaiveDate) -> Result<bool, LedgerError> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO visit_days (subject, day) VALUES (?1, ?2)",
            params![subject.as_str(), day.to_string()],
        )?;
        Ok(inserted > 0)
    }

    fn snapshot(&self, subject: &SubjectId) -> Result<ActivitySnapshot, LedgerError> {
        let mut conn = self.conn.lock().unwrap();
        // One transaction so the three reads see the same state.
        let tx = conn.transaction()?;
        let mut snap = ActivitySnapshot::default();

        {
            let mut stmt =
                tx.prepare("SELECT category, day, count FROM daily_counts WHERE subject = ?1")?;
            let rows = stmt.query_map([subject.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?;
            for row in rows {
                let (category, day, count) = row?;
                let Ok(category) = category.parse::<EventCategory>() else {
                    tracing::warn!("skipping unknown category '{category}' in daily_counts");
                    continue;
                };
                let Ok(day) = day.parse::<NaiveDate>() else {
                    tracing::warn!("skipping malformed day '{day}' in daily_counts");
                    continue;
                };
                snap.daily.bump(category, day, count.max(0) as u64);
            }
        }

        {
            let mut stmt =
                tx.prepare("SELECT category, total FROM running_totals WHERE subject = ?1")?;
            let rows = stmt.query_map([subject.as_str()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (category, total) = row?;
                let Ok(category) = category.parse::<EventCategory>() else {
                    tracing::warn!("skipping unknown category '{category}' in running_totals");
                    continue;
                };
                snap.totals.add(category, total.max(0) as u64);
            }
        }

        {
            let mut stmt = tx.prepare("SELECT day FROM visit_days WHERE subject = ?1")?;
            let rows = stmt.query_map([subject.as_str()], |row| row.get::<_, String>(0))?;
            for row in rows {
                let day = row?;
                match day.parse::<NaiveDate>() {
                    Ok(day) => {
                        snap.visits.insert(day);
                    }
                    Err(_) => tracing::warn!("skipping malformed day '{day}' in visit_days"),
                }
            }
        }

        tx.commit()?;
        Ok(snap)
    }
}
