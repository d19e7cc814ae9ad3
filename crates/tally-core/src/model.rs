//! Core data model for the activity ledger.
//!
//! All calendar bucketing uses UTC dates. A subject owns four per-day
//! counter maps plus a set of distinct visit dates; lifetime totals are
//! maintained alongside the daily buckets rather than recomputed on read.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// Identity that owns a ledger of events.
///
/// Either an authenticated user identifier or the shared guest sentinel
/// used while nobody is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    /// Sentinel identifier for unauthenticated use.
    pub const GUEST: &'static str = "guest";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The shared guest subject.
    pub fn guest() -> Self {
        Self(Self::GUEST.to_string())
    }

    pub fn is_guest(&self) -> bool {
        self.0 == Self::GUEST
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One user action category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Conversion,
    Calculation,
    DateCalculation,
    NoteSaved,
    Visit,
}

impl EventCategory {
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Conversion,
        EventCategory::Calculation,
        EventCategory::DateCalculation,
        EventCategory::NoteSaved,
        EventCategory::Visit,
    ];

    /// Stable storage key for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Conversion => "conversion",
            EventCategory::Calculation => "calculation",
            EventCategory::DateCalculation => "date_calculation",
            EventCategory::NoteSaved => "note_saved",
            EventCategory::Visit => "visit",
        }
    }

    /// Whether per-day counter buckets are kept for this category.
    /// Visits live in the visit-date set instead.
    pub fn counts_daily(&self) -> bool {
        !matches!(self, EventCategory::Visit)
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conversion" => Ok(EventCategory::Conversion),
            "calculation" => Ok(EventCategory::Calculation),
            "date_calculation" => Ok(EventCategory::DateCalculation),
            "note_saved" => Ok(EventCategory::NoteSaved),
            "visit" => Ok(EventCategory::Visit),
            other => Err(LedgerError::UnknownCategory(other.to_string())),
        }
    }
}

/// Per-calendar-day counters for one category, keyed by UTC date.
pub type DailyCount = BTreeMap<NaiveDate, u64>;

/// Distinct UTC dates on which the subject was active.
pub type VisitRecord = BTreeSet<NaiveDate>;

/// Per-day counter buckets for the counted categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCounts {
    #[serde(default)]
    pub conversions: DailyCount,
    #[serde(default)]
    pub calculations: DailyCount,
    #[serde(default)]
    pub date_calculations: DailyCount,
    #[serde(default)]
    pub notes_saved: DailyCount,
}

impl DailyCounts {
    /// Buckets for one category, or `None` for [`EventCategory::Visit`].
    pub fn for_category(&self, category: EventCategory) -> Option<&DailyCount> {
        match category {
            EventCategory::Conversion => Some(&self.conversions),
            EventCategory::Calculation => Some(&self.calculations),
            EventCategory::DateCalculation => Some(&self.date_calculations),
            EventCategory::NoteSaved => Some(&self.notes_saved),
            EventCategory::Visit => None,
        }
    }

    /// Add `by` to the bucket for `day`. No-op for [`EventCategory::Visit`].
    pub fn bump(&mut self, category: EventCategory, day: NaiveDate, by: u64) {
        let map = match category {
            EventCategory::Conversion => &mut self.conversions,
            EventCategory::Calculation => &mut self.calculations,
            EventCategory::DateCalculation => &mut self.date_calculations,
            EventCategory::NoteSaved => &mut self.notes_saved,
            EventCategory::Visit => return,
        };
        let slot = map.entry(day).or_insert(0);
        *slot = slot.saturating_add(by);
    }
}

/// Lifetime counters per category, maintained incrementally on write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningTotals {
    #[serde(default)]
    pub conversions: u64,
    #[serde(default)]
    pub calculations: u64,
    #[serde(default)]
    pub date_calculations: u64,
    #[serde(default)]
    pub notes_saved: u64,
}

impl RunningTotals {
    /// Lifetime count for one category. Zero for [`EventCategory::Visit`],
    /// which is tracked in the visit-date set.
    pub fn get(&self, category: EventCategory) -> u64 {
        match category {
            EventCategory::Conversion => self.conversions,
            EventCategory::Calculation => self.calculations,
            EventCategory::DateCalculation => self.date_calculations,
            EventCategory::NoteSaved => self.notes_saved,
            EventCategory::Visit => 0,
        }
    }

    /// Add `by` to one category's total. No-op for [`EventCategory::Visit`].
    pub fn add(&mut self, category: EventCategory, by: u64) {
        let slot = match category {
            EventCategory::Conversion => &mut self.conversions,
            EventCategory::Calculation => &mut self.calculations,
            EventCategory::DateCalculation => &mut self.date_calculations,
            EventCategory::NoteSaved => &mut self.notes_saved,
            EventCategory::Visit => return,
        };
        *slot = slot.saturating_add(by);
    }

    /// Sum across every counted category.
    pub fn sum(&self) -> u64 {
        self.conversions
            .saturating_add(self.calculations)
            .saturating_add(self.date_calculations)
            .saturating_add(self.notes_saved)
    }
}

/// Consistent point-in-time view of one subject's ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    #[serde(default)]
    pub daily: DailyCounts,
    #[serde(default)]
    pub totals: RunningTotals,
    #[serde(default)]
    pub visits: VisitRecord,
}
