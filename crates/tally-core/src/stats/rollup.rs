//! Daily rollups over sparse per-day counters.
//!
//! These are pure functions over a [`DailyCount`] snapshot. Intervals are
//! inclusive on both ends: rolling up `[start, end]` always yields exactly
//! `end - start + 1` buckets, zero-filled for days with no recorded events.
//! "Today" is always a UTC calendar date; callers that care about a fixed
//! reference day pass it explicitly.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::DailyCount;

/// Inclusive calendar-day interval.
///
/// An interval with `end < start` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The trailing window of `days` calendar days ending at `end`.
    pub fn trailing(days: u32, end: NaiveDate) -> Self {
        let span = Duration::days(i64::from(days.saturating_sub(1)));
        Self {
            start: end - span,
            end,
        }
    }

    /// From the first day of `today`'s month through `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self {
            start: today.with_day(1).unwrap_or(today),
            end: today,
        }
    }

    /// Number of calendar days covered, zero when empty.
    pub fn days(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            ((self.end - self.start).num_days() + 1) as u64
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// One output bucket of a rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    pub day: NaiveDate,
    pub count: u64,
}

/// Roll per-day counters up into one bucket per calendar day of `interval`.
///
/// Days without recorded events yield a zero bucket; the output length
/// always equals [`DateInterval::days`].
pub fn rollup(counts: &DailyCount, interval: DateInterval) -> Vec<DayBucket> {
    let mut out = Vec::with_capacity(interval.days() as usize);
    if interval.end < interval.start {
        return out;
    }
    let mut day = interval.start;
    loop {
        out.push(DayBucket {
            day,
            count: counts.get(&day).copied().unwrap_or(0),
        });
        if day >= interval.end {
            break;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    out
}

/// Count recorded on `today`.
pub fn today_count(counts: &DailyCount, today: NaiveDate) -> u64 {
    counts.get(&today).copied().unwrap_or(0)
}

/// Sum of every bucket. Equals the running total whenever the ledger has
/// kept the two in sync.
pub fn all_time(counts: &DailyCount) -> u64 {
    counts.values().fold(0u64, |acc, v| acc.saturating_add(*v))
}

/// Trailing 7 calendar days ending at `today`.
pub fn weekly(counts: &DailyCount, today: NaiveDate) -> Vec<DayBucket> {
    rollup(counts, DateInterval::trailing(7, today))
}

/// Current calendar month through `today`.
pub fn monthly(counts: &DailyCount, today: NaiveDate) -> Vec<DayBucket> {
    rollup(counts, DateInterval::month_to_date(today))
}

/// Today's UTC calendar date. The single clock read used by convenience
/// wrappers; everything else takes the date as a parameter.
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}
