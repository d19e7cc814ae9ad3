//! Append-only activity ledger over a persistence backend.
//!
//! The [`Backend`] trait is the seam to the persistence collaborator; the
//! [`Ledger`] facade applies the recovery policy on top of it: reads
//! degrade to the local fallback store (then to zero activity) and write
//! failures are logged and dropped. Nothing on the facade is fatal.

pub mod local;
pub mod memory;
pub mod sqlite;
mod subscription;

pub use local::LocalStore;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;
pub use subscription::Subscription;

use chrono::NaiveDate;

use crate::error::LedgerError;
use crate::model::{ActivitySnapshot, EventCategory, SubjectId};
use crate::stats;

use subscription::SubscriberRegistry;

/// Storage contract for the activity ledger.
///
/// Implementations must apply each increment as an atomic read-modify-write
/// (or an equivalent conflict-free merge), so concurrent writers for the
/// same subject cannot lose updates.
pub trait Backend: Send + Sync {
    /// Add 1 to the per-day bucket and the running total for `category`,
    /// atomically with respect to other writers for the same subject.
    /// `category` is one of the counted categories; visits go through
    /// [`Backend::insert_visit`].
    fn increment(
        &self,
        subject: &SubjectId,
        category: EventCategory,
        day: NaiveDate,
    ) -> Result<(), LedgerError>;

    /// Insert `day` into the subject's visit set. Returns false when the
    /// day was already present (set semantics).
    fn insert_visit(&self, subject: &SubjectId, day: NaiveDate) -> Result<bool, LedgerError>;

    /// Consistent point-in-time view of the subject's data.
    fn snapshot(&self, subject: &SubjectId) -> Result<ActivitySnapshot, LedgerError>;
}

/// Activity ledger facade.
///
/// Records events dated by UTC calendar day, reads consistent snapshots,
/// and notifies subscribers with full replacement snapshots after each
/// applied write.
pub struct Ledger<B: Backend> {
    backend: B,
    fallback: Option<LocalStore>,
    subscribers: SubscriberRegistry,
}

impl<B: Backend> Ledger<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            fallback: None,
            subscribers: SubscriberRegistry::default(),
        }
    }

    /// Attach a local fallback store used when the backend is unreachable.
    pub fn with_fallback(backend: B, fallback: LocalStore) -> Self {
        Self {
            backend,
            fallback: Some(fallback),
            subscribers: SubscriberRegistry::default(),
        }
    }

    /// Record one user action dated today (UTC).
    pub fn record_event(&self, subject: &SubjectId, category: EventCategory) {
        self.record_event_on(subject, category, stats::utc_today());
    }

    /// Record one user action on an explicit day.
    ///
    /// A [`EventCategory::Visit`] event is routed to the visit set; the
    /// counted categories update their daily bucket and running total
    /// together. Backend failures fall through to the fallback store when
    /// one is attached, otherwise the write is logged and dropped.
    pub fn record_event_on(&self, subject: &SubjectId, category: EventCategory, day: NaiveDate) {
        if category == EventCategory::Visit {
            self.record_visit_on(subject, day);
            return;
        }
        match self.backend.increment(subject, category, day) {
            Ok(()) => self.notify(subject),
            Err(err) => {
                tracing::warn!("ledger write failed for {subject}/{category}: {err}");
                if let Some(fallback) = &self.fallback {
                    fallback.record_increment(subject, category, day);
                    self.notify(subject);
                }
            }
        }
    }

    /// Record today's visit (UTC). Idempotent per day.
    pub fn record_visit(&self, subject: &SubjectId) {
        self.record_visit_on(subject, stats::utc_today());
    }

    /// Record a visit on an explicit day. Idempotent per day.
    pub fn record_visit_on(&self, subject: &SubjectId, day: NaiveDate) {
        match self.backend.insert_visit(subject, day) {
            Ok(true) => self.notify(subject),
            Ok(false) => {}
            Err(err) => {
                tracing::warn!("visit write failed for {subject}: {err}");
                if let Some(fallback) = &self.fallback {
                    if fallback.record_visit(subject, day) {
                        self.notify(subject);
                    }
                }
            }
        }
    }

    /// Read a consistent snapshot of the subject's activity.
    ///
    /// A backend failure degrades to the fallback store's last-known state,
    /// then to zero activity. Never an error for the caller.
    pub fn read_snapshot(&self, subject: &SubjectId) -> ActivitySnapshot {
        match self.backend.snapshot(subject) {
            Ok(snap) => snap,
            Err(err) => {
                tracing::warn!("ledger read failed for {subject}, serving fallback: {err}");
                self.fallback
                    .as_ref()
                    .map(|store| store.read_snapshot(subject))
                    .unwrap_or_default()
            }
        }
    }

    /// Subscribe to change notifications for one subject.
    ///
    /// Each notification carries a full replacement snapshot. Callbacks are
    /// serialized (never two at once) and must not re-enter the ledger.
    /// Dropping the returned handle unsubscribes.
    pub fn subscribe(
        &self,
        subject: &SubjectId,
        callback: impl Fn(&ActivitySnapshot) + Send + Sync + 'static,
    ) -> Subscription {
        self.subscribers.add(subject.clone(), Box::new(callback))
    }

    fn notify(&self, subject: &SubjectId) {
        if !self.subscribers.has_subscribers(subject) {
            return;
        }
        let snapshot = self.read_snapshot(subject);
        self.subscribers.dispatch(subject, &snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Backend that always reports the collaborator as unreachable.
    struct UnavailableBackend;

    impl Backend for UnavailableBackend {
        fn increment(
            &self,
            _subject: &SubjectId,
            _category: EventCategory,
            _day: NaiveDate,
        ) -> Result<(), LedgerError> {
            Err(LedgerError::BackendUnavailable("offline".into()))
        }

        fn insert_visit(&self, _subject: &SubjectId, _day: NaiveDate) -> Result<bool, LedgerError> {
            Err(LedgerError::BackendUnavailable("offline".into()))
        }

        fn snapshot(&self, _subject: &SubjectId) -> Result<ActivitySnapshot, LedgerError> {
            Err(LedgerError::BackendUnavailable("offline".into()))
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_visit_event_routes_to_visit_set() {
        let ledger = Ledger::new(MemoryBackend::new());
        let subject = SubjectId::new("alice");
        let day = date("2024-01-03");

        ledger.record_event_on(&subject, EventCategory::Visit, day);
        ledger.record_event_on(&subject, EventCategory::Visit, day);

        let snap = ledger.read_snapshot(&subject);
        assert_eq!(snap.visits.len(), 1);
        assert_eq!(snap.totals.sum(), 0);
    }

    #[test]
    fn test_unavailable_backend_reads_as_zero_activity() {
        let ledger = Ledger::new(UnavailableBackend);
        let snap = ledger.read_snapshot(&SubjectId::guest());
        assert_eq!(snap, ActivitySnapshot::default());
    }

    #[test]
    fn test_writes_degrade_to_fallback_store() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = LocalStore::open(dir.path().join("activity.json"));
        let ledger = Ledger::with_fallback(UnavailableBackend, fallback);
        let subject = SubjectId::guest();
        let day = date("2024-01-03");

        ledger.record_event_on(&subject, EventCategory::Conversion, day);
        ledger.record_visit_on(&subject, day);

        let snap = ledger.read_snapshot(&subject);
        assert_eq!(snap.totals.conversions, 1);
        assert!(snap.visits.contains(&day));
    }

    #[test]
    fn test_subscriber_sees_full_snapshot_after_write() {
        let ledger = Ledger::new(MemoryBackend::new());
        let subject = SubjectId::new("alice");
        let seen = Arc::new(AtomicUsize::new(0));

        let seen_clone = seen.clone();
        let sub = ledger.subscribe(&subject, move |snapshot| {
            seen_clone.store(snapshot.totals.sum() as usize, Ordering::SeqCst);
        });

        ledger.record_event_on(&subject, EventCategory::Conversion, date("2024-01-03"));
        ledger.record_event_on(&subject, EventCategory::Calculation, date("2024-01-03"));
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        sub.unsubscribe();
        ledger.record_event_on(&subject, EventCategory::Conversion, date("2024-01-04"));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_duplicate_visit_does_not_notify() {
        let ledger = Ledger::new(MemoryBackend::new());
        let subject = SubjectId::new("alice");
        let fired = Arc::new(AtomicUsize::new(0));

        let fired_clone = fired.clone();
        let _sub = ledger.subscribe(&subject, move |_| {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        let day = date("2024-01-03");
        ledger.record_visit_on(&subject, day);
        ledger.record_visit_on(&subject, day);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
