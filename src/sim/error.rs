//! Contract violations inside the simulation
//!
//! Losing the game is not an error; it is reported through `TickOutcome`.

use std::fmt;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimError {
    /// Aim requested between two coincident centers
    DegenerateDirection { from: Vec2, to: Vec2 },
    /// Fire requested while the charge counter is negative
    InvalidChargeFire { charge: i32 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::DegenerateDirection { from, to } => write!(
                f,
                "degenerate direction: from ({}, {}) to ({}, {})",
                from.x, from.y, to.x, to.y
            ),
            SimError::InvalidChargeFire { charge } => {
                write!(f, "fire requested with negative charge counter: {charge}")
            }
        }
    }
}

impl std::error::Error for SimError {}
