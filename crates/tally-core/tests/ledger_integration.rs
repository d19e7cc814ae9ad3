//! End-to-end ledger tests: events recorded through the facade, read back
//! as snapshots and aggregated.

use chrono::NaiveDate;
use proptest::prelude::*;

use tally_core::stats;
use tally_core::{Backend, EventCategory, Ledger, MemoryBackend, SqliteBackend, SubjectId};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn test_three_day_scenario_over_sqlite() {
    // One conversion and one visit on each of 2024-01-01..03.
    let dir = tempfile::tempdir().unwrap();
    let backend = SqliteBackend::open(&dir.path().join("tally.db")).unwrap();
    let ledger = Ledger::new(backend);
    let subject = SubjectId::new("alice");
    let today = date("2024-01-03");

    for day in ["2024-01-01", "2024-01-02", "2024-01-03"] {
        ledger.record_event_on(&subject, EventCategory::Conversion, date(day));
        ledger.record_visit_on(&subject, date(day));
    }

    let snap = ledger.read_snapshot(&subject);

    let buckets = stats::rollup(
        &snap.daily.conversions,
        stats::DateInterval::new(date("2024-01-01"), today),
    );
    let values: Vec<u64> = buckets.iter().map(|b| b.count).collect();
    assert_eq!(values, vec![1, 1, 1]);

    assert_eq!(stats::all_time(&snap.daily.conversions), 3);
    assert_eq!(snap.totals.conversions, 3);

    let streak = stats::streak_state(&snap.visits, today);
    assert_eq!(streak.current_streak, 3);
    assert_eq!(streak.best_streak, 3);
    assert_eq!(streak.days_not_opened, 0);
}

#[test]
fn test_snapshot_survives_backend_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally.db");
    let subject = SubjectId::new("alice");

    {
        let ledger = Ledger::new(SqliteBackend::open(&path).unwrap());
        ledger.record_event_on(&subject, EventCategory::NoteSaved, date("2024-02-01"));
        ledger.record_visit_on(&subject, date("2024-02-01"));
    }

    let ledger = Ledger::new(SqliteBackend::open(&path).unwrap());
    let snap = ledger.read_snapshot(&subject);
    assert_eq!(snap.totals.notes_saved, 1);
    assert!(snap.visits.contains(&date("2024-02-01")));
}

#[test]
fn test_visit_recording_is_idempotent_through_the_facade() {
    let ledger = Ledger::new(MemoryBackend::new());
    let subject = SubjectId::guest();
    let day = date("2024-01-05");

    ledger.record_visit_on(&subject, day);
    ledger.record_visit_on(&subject, day);
    ledger.record_event_on(&subject, EventCategory::Visit, day);

    let snap = ledger.read_snapshot(&subject);
    assert_eq!(snap.visits.len(), 1);
}

#[test]
fn test_level_progression_follows_lifetime_totals() {
    let ledger = Ledger::new(MemoryBackend::new());
    let subject = SubjectId::new("alice");
    let day = date("2024-01-05");

    for _ in 0..25 {
        ledger.record_event_on(&subject, EventCategory::Calculation, day);
    }

    let snap = ledger.read_snapshot(&subject);
    let level = stats::level_state(snap.totals.sum());
    assert_eq!(level.level, 2);
    assert_eq!(level.into_level, 5);
}

proptest! {
    /// No lost updates: after any sequence of recorded events, the sum over
    /// the daily buckets equals the running total, per category.
    #[test]
    fn prop_all_time_equals_running_total(
        ops in proptest::collection::vec((0usize..4, 0i64..30), 0..200),
    ) {
        let categories = [
            EventCategory::Conversion,
            EventCategory::Calculation,
            EventCategory::DateCalculation,
            EventCategory::NoteSaved,
        ];
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let backend = MemoryBackend::new();
        let subject = SubjectId::new("prop");

        for (cat_idx, day_off) in &ops {
            backend
                .increment(&subject, categories[*cat_idx], base + chrono::Duration::days(*day_off))
                .unwrap();
        }

        let snap = backend.snapshot(&subject).unwrap();
        for category in categories {
            let daily = snap.daily.for_category(category).unwrap();
            prop_assert_eq!(stats::all_time(daily), snap.totals.get(category));
        }
        prop_assert_eq!(
            snap.totals.sum(),
            ops.len() as u64
        );
    }
}
