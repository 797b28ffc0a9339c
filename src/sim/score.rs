//! Score bookkeeping

use serde::{Deserialize, Serialize};

/// Points for an enemy shot down
pub const ENEMY_POINTS: u32 = 10;
/// Points for a bomb shot down
pub const THREAT_POINTS: u32 = 1;
/// Points for a bomb absorbed while empowered
pub const ABSORB_POINTS: u32 = 1;

/// The run's score counter
///
/// Gains never go below zero. Spending is guarded: a purchase the balance
/// cannot cover is refused and leaves the score untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Score(i64);

impl Score {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn add(&mut self, points: u32) {
        self.0 = self.0.saturating_add(i64::from(points));
    }

    /// Deduct `cost` if the balance covers it
    pub fn try_spend(&mut self, cost: i64) -> bool {
        if cost < 0 || self.0 < cost {
            return false;
        }
        self.0 -= cost;
        true
    }
}
