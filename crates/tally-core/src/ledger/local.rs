//! JSON-file fallback store.
//!
//! Holds per-subject activity for use when the primary backend is
//! unreachable or the subject is the unauthenticated guest. The whole
//! store is one JSON document keyed by subject, read and written
//! synchronously. A missing or malformed file degrades to an empty store;
//! a failed write is logged and dropped.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, StoreError};
use crate::model::{ActivitySnapshot, EventCategory, SubjectId};

use super::Backend;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    subjects: HashMap<String, ActivitySnapshot>,
}

/// Synchronous local fallback store.
pub struct LocalStore {
    path: PathBuf,
    doc: Mutex<StoreDocument>,
}

impl LocalStore {
    /// Open the store at `path`, tolerating a missing or malformed file.
    pub fn open(path: PathBuf) -> Self {
        let doc = match Self::load(&path) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!("local store unreadable, starting empty: {err}");
                StoreDocument::default()
            }
        };
        Self {
            path,
            doc: Mutex::new(doc),
        }
    }

    fn load(path: &PathBuf) -> Result<StoreDocument, StoreError> {
        if !path.exists() {
            return Ok(StoreDocument::default());
        }
        let content = fs::read_to_string(path).map_err(|source| StoreError::ReadFailed {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| StoreError::MalformedSnapshot {
            path: path.clone(),
            message: e.to_string(),
        })
    }

    /// Add 1 to the per-day bucket and running total for `category`.
    pub fn record_increment(&self, subject: &SubjectId, category: EventCategory, day: NaiveDate) {
        let mut guard = self.doc.lock().unwrap();
        let snapshot = guard.subjects.entry(subject.to_string()).or_default();
        snapshot.daily.bump(category, day, 1);
        snapshot.totals.add(category, 1);
        self.persist(&guard);
    }

    /// Insert `day` into the subject's visit set. Returns false when the
    /// day was already present.
    pub fn record_visit(&self, subject: &SubjectId, day: NaiveDate) -> bool {
        let mut guard = self.doc.lock().unwrap();
        let snapshot = guard.subjects.entry(subject.to_string()).or_default();
        let inserted = snapshot.visits.insert(day);
        if inserted {
            self.persist(&guard);
        }
        inserted
    }

    /// Last-known activity for `subject`, empty when never recorded.
    pub fn read_snapshot(&self, subject: &SubjectId) -> ActivitySnapshot {
        let guard = self.doc.lock().unwrap();
        guard
            .subjects
            .get(subject.as_str())
            .cloned()
            .unwrap_or_default()
    }

    fn persist(&self, doc: &StoreDocument) {
        let json = match serde_json::to_string_pretty(doc) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("dropping local store write, serialize failed: {err}");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Err(err) = fs::write(&self.path, json) {
            tracing::warn!("dropping local store write to {}: {err}", self.path.display());
        }
    }
}

// The fallback store also satisfies the backend contract, for guest-only
// ledgers that never reach a primary backend.
impl Backend for LocalStore {
    fn increment(
        &self,
        subject: &SubjectId,
        category: EventCategory,
        day: NaiveDate,
    ) -> Result<(), LedgerError> {
        self.record_increment(subject, category, day);
        Ok(())
    }

    fn insert_visit(&self, subject: &SubjectId, day: NaiveDate) -> Result<bool, LedgerError> {
        Ok(self.record_visit(subject, day))
    }

    fn snapshot(&self, subject: &SubjectId) -> Result<ActivitySnapshot, LedgerError> {
        Ok(self.read_snapshot(subject))
    }
}
