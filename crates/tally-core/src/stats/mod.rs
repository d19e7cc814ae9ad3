//! Aggregation and derived statistics over ledger snapshots.
//!
//! Everything here is a pure function over data supplied by the ledger:
//! daily rollups, streak derivation, and profile level progression.

mod level;
mod rollup;
mod streak;

pub use level::{level_state, LevelState};
pub use rollup::{
    all_time, monthly, rollup, today_count, utc_today, weekly, DateInterval, DayBucket,
};
pub use streak::{streak_state, StreakState};
