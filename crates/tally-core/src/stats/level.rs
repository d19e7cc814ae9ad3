//! Profile level derivation from lifetime activity.
//!
//! Feeds the profile/gamification surface: a level is earned from the sum
//! of all lifetime counters, with each level requiring more actions than
//! the one before it.

use serde::{Deserialize, Serialize};

/// Actions needed to finish level 1; level `n` needs `n` times this.
const ACTIONS_PER_LEVEL: u64 = 20;

/// Derived profile level for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    /// Current level, starting at 1.
    pub level: u32,
    /// Lifetime actions across all counted categories.
    pub total_actions: u64,
    /// Actions accumulated inside the current level.
    pub into_level: u64,
    /// Actions still needed to reach the next level.
    pub to_next: u64,
}

impl LevelState {
    /// Display title for the level band.
    pub fn title(&self) -> &'static str {
        match self.level {
            0..=2 => "Novice",
            3..=5 => "Apprentice",
            6..=10 => "Adept",
            11..=20 => "Expert",
            _ => "Master",
        }
    }
}

/// Compute the level reached after `total_actions` lifetime actions.
pub fn level_state(total_actions: u64) -> LevelState {
    let mut level: u32 = 1;
    let mut remaining = total_actions;
    loop {
        let needed = u64::from(level) * ACTIONS_PER_LEVEL;
        if remaining < needed {
            return LevelState {
                level,
                total_actions,
                into_level: remaining,
                to_next: needed - remaining,
            };
        }
        remaining -= needed;
        level += 1;
    }
}
