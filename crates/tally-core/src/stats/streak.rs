//! Consecutive-day visit streaks.
//!
//! Streaks are derived on demand from the visit-date set and never stored:
//! the set alone must always be enough to reproduce them.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::VisitRecord;

/// Derived streak summary for one subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    /// Length of the run of consecutive visit days ending today or
    /// yesterday. Zero when that run is already broken.
    pub current_streak: u32,
    /// Longest run of consecutive visit days ever recorded.
    pub best_streak: u32,
    /// Days in the lifetime window `[first visit, today]` with no recorded
    /// visit. Not "days since last visit".
    pub days_not_opened: u32,
}

/// Compute the streak state as of `today` (a UTC calendar date).
///
/// Zero visits yield the all-zero state. With at least one visit the best
/// streak is at least 1; the current streak is zero when the most recent
/// visit is strictly more than one day in the past.
pub fn streak_state(visits: &VisitRecord, today: NaiveDate) -> StreakState {
    let one_day = Duration::days(1);

    let (first, last) = match (visits.iter().next(), visits.iter().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return StreakState::default(),
    };

    // Ascending scan for the best run.
    let mut best: u32 = 1;
    let mut run: u32 = 1;
    let mut prev: Option<NaiveDate> = None;
    for &day in visits.iter() {
        if let Some(p) = prev {
            if day - p == one_day {
                run += 1;
            } else {
                run = 1;
            }
            best = best.max(run);
        }
        prev = Some(day);
    }

    // Walk backward from the most recent visit. A last visit more than one
    // day before today means the streak is already broken.
    let mut current: u32 = 0;
    if (today - last).num_days() <= 1 {
        current = 1;
        let mut cursor = last;
        for &day in visits.iter().rev().skip(1) {
            if cursor - day == one_day {
                current += 1;
                cursor = day;
            } else {
                break;
            }
        }
    }

    let window = (today - first).num_days() + 1;
    let missed = window - visits.len() as i64;
    let days_not_opened = missed.max(0) as u32;

    StreakState {
        current_streak: current,
        best_streak: best,
        days_not_opened,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn visits(days: &[&str]) -> VisitRecord {
        days.iter().map(|d| date(d)).collect()
    }

    #[test]
    fn test_no_visits_all_zero() {
        let state = streak_state(&VisitRecord::new(), date("2024-01-05"));
        assert_eq!(state, StreakState::default());
    }

    #[test]
    fn test_single_visit_today() {
        let state = streak_state(&visits(&["2024-01-05"]), date("2024-01-05"));
        assert_eq!(state.current_streak, 1);
        assert_eq!(state.best_streak, 1);
        assert_eq!(state.days_not_opened, 0);
    }

    #[test]
    fn test_yesterday_and_today() {
        let state = streak_state(&visits(&["2024-01-04", "2024-01-05"]), date("2024-01-05"));
        assert_eq!(state.current_streak, 2);
        assert_eq!(state.best_streak, 2);
        assert_eq!(state.days_not_opened, 0);
    }

    #[test]
    fn test_consecutive_run_ending_today() {
        // Visits on 2024-01-01..03, today = 01-03.
        let state = streak_state(
            &visits(&["2024-01-01", "2024-01-02", "2024-01-03"]),
            date("2024-01-03"),
        );
        assert_eq!(state.current_streak, 3);
        assert_eq!(state.best_streak, 3);
        assert_eq!(state.days_not_opened, 0);
    }

    #[test]
    fn test_streak_still_alive_when_last_visit_was_yesterday() {
        let state = streak_state(
            &visits(&["2024-01-02", "2024-01-03", "2024-01-04"]),
            date("2024-01-05"),
        );
        assert_eq!(state.current_streak, 3);
        assert_eq!(state.best_streak, 3);
    }

    #[test]
    fn test_gap_breaks_current_but_not_best() {
        // Three-day run, then silence; today is two days after the run.
        let state = streak_state(
            &visits(&["2024-01-01", "2024-01-02", "2024-01-03"]),
            date("2024-01-05"),
        );
        assert_eq!(state.current_streak, 0);
        assert_eq!(state.best_streak, 3);
        assert_eq!(state.days_not_opened, 2);
    }

    #[test]
    fn test_isolated_visits_scenario() {
        // Two isolated visits: 2024-01-01 and 2024-01-05, today = 01-05.
        let state = streak_state(&visits(&["2024-01-01", "2024-01-05"]), date("2024-01-05"));
        assert_eq!(state.best_streak, 1);
        assert_eq!(state.current_streak, 1);
        assert_eq!(state.days_not_opened, 3);
    }

    #[test]
    fn test_current_run_shorter_than_best() {
        // A long run in the past, a fresh two-day run now.
        let state = streak_state(
            &visits(&[
                "2024-01-01",
                "2024-01-02",
                "2024-01-03",
                "2024-01-04",
                "2024-01-09",
                "2024-01-10",
            ]),
            date("2024-01-10"),
        );
        assert_eq!(state.best_streak, 4);
        assert_eq!(state.current_streak, 2);
        assert_eq!(state.days_not_opened, 4);
    }

    #[test]
    fn test_recomputation_is_stable() {
        // Derived, not stored: recomputing from the same set is identical.
        let record = visits(&["2024-03-01", "2024-03-02", "2024-03-05"]);
        let today = date("2024-03-06");
        assert_eq!(streak_state(&record, today), streak_state(&record, today));
    }
}
