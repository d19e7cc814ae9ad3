//! # Tally Core Library
//!
//! This library provides the core business logic for Tally: a
//! time-bucketed activity ledger with streak derivation, plus a cached
//! currency-rate lookup. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary, with any GUI
//! staying a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Ledger**: append-only store of per-day activity counters and visit
//!   dates over a pluggable backend, with atomic increments and a local
//!   JSON fallback when the backend is unreachable
//! - **Stats**: pure rollup/streak/level functions over ledger snapshots,
//!   bucketed by UTC calendar day
//! - **Rates**: TTL-bounded currency-rate cache with in-flight request
//!   coalescing in front of an HTTP rate service
//!
//! ## Key Components
//!
//! - [`Ledger`]: activity recording and snapshot reads
//! - [`Backend`]: storage contract for persistence collaborators
//! - [`RateCache`]: memoized currency rate lookup
//! - [`Config`]: application configuration management

pub mod config;
pub mod error;
pub mod ledger;
pub mod model;
pub mod rates;
pub mod stats;

pub use config::{data_dir, Config};
pub use error::{ConfigError, CoreError, LedgerError, RateError, StoreError};
pub use ledger::{Backend, Ledger, LocalStore, MemoryBackend, SqliteBackend, Subscription};
pub use model::{
    ActivitySnapshot, DailyCount, DailyCounts, EventCategory, RunningTotals, SubjectId,
    VisitRecord,
};
pub use rates::{Currency, HttpRateProvider, RateCache, RateProvider};
pub use stats::{DateInterval, DayBucket, LevelState, StreakState};
