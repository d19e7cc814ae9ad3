//! In-memory ledger backend.
//!
//! Reference implementation of the [`Backend`] contract, used by tests and
//! for ephemeral sessions that never touch disk. The whole map sits behind
//! one mutex, so every increment is an atomic read-modify-write.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;

use crate::error::LedgerError;
use crate::model::{ActivitySnapshot, EventCategory, SubjectId};

use super::Backend;

/// In-memory [`Backend`].
#[derive(Default)]
pub struct MemoryBackend {
    subjects: Mutex<HashMap<SubjectId, ActivitySnapshot>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn increment(
        &self,
        subject: &SubjectId,
        category: EventCategory,
        day: NaiveDate,
    ) -> Result<(), LedgerError> {
        let mut guard = self.subjects.lock().unwrap();
        let snapshot = guard.entry(subject.clone()).or_default();
        snapshot.daily.bump(category, day, 1);
        snapshot.totals.add(category, 1);
        Ok(())
    }

    fn insert_visit(&self, subject: &SubjectId, day: NaiveDate) -> Result<bool, LedgerError> {
        let mut guard = self.subjects.lock().unwrap();
        let snapshot = guard.entry(subject.clone()).or_default();
        Ok(snapshot.visits.insert(day))
    }

    fn snapshot(&self, subject: &SubjectId) -> Result<ActivitySnapshot, LedgerError> {
        let guard = self.subjects.lock().unwrap();
        Ok(guard.get(subject).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_unknown_subject_is_zero_activity() {
        let backend = MemoryBackend::new();
        let snap = backend.snapshot(&SubjectId::new("nobody")).unwrap();
        assert_eq!(snap, ActivitySnapshot::default());
    }

    #[test]
    fn test_increment_keeps_daily_and_total_in_sync() {
        let backend = MemoryBackend::new();
        let subject = SubjectId::new("alice");
        let day = date("2024-01-03");

        for _ in 0..5 {
            backend
                .increment(&subject, EventCategory::Conversion, day)
                .unwrap();
        }
        backend
            .increment(&subject, EventCategory::Calculation, day)
            .unwrap();

        let snap = backend.snapshot(&subject).unwrap();
        assert_eq!(stats::all_time(&snap.daily.conversions), 5);
        assert_eq!(snap.totals.conversions, 5);
        assert_eq!(snap.totals.calculations, 1);
    }

    #[test]
    fn test_visit_insert_is_idempotent() {
        let backend = MemoryBackend::new();
        let subject = SubjectId::new("alice");
        let day = date("2024-01-03");

        assert!(backend.insert_visit(&subject, day).unwrap());
        assert!(!backend.insert_visit(&subject, day).unwrap());

        let snap = backend.snapshot(&subject).unwrap();
        assert_eq!(snap.visits.len(), 1);
    }

    #[test]
    fn test_subjects_are_isolated() {
        let backend = MemoryBackend::new();
        let day = date("2024-01-03");
        backend
            .increment(&SubjectId::new("alice"), EventCategory::NoteSaved, day)
            .unwrap();

        let snap = backend.snapshot(&SubjectId::new("bob")).unwrap();
        assert_eq!(snap.totals.sum(), 0);
    }
}
