//! Sky Barrage - a vertical arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, movement, collisions, phases)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio and input polling live in the host. The host feeds a
//! [`sim::TickInput`] per tick and draws the [`sim::Frame`] it gets back.

pub mod sim;
pub mod tuning;

pub use sim::{
    Engine, Frame, GameEvent, GamePhase, RunOutcome, SimError, TickInput, TickOutcome,
};
pub use tuning::{BossDefeatPolicy, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Simulation rate the host should drive `Engine::tick` at
    pub const TICKS_PER_SECOND: u32 = 50;
    /// Host pacing per tick (20 ms at 50 Hz)
    pub const TICK_INTERVAL: Duration = Duration::from_millis(1000 / TICKS_PER_SECOND as u64);
    /// Nominal timestep, in ticks. All speeds are per tick.
    pub const SIM_DT: f32 = 1.0;

    /// Explosion left behind by a destroyed enemy
    pub const ENEMY_EXPLOSION_LIFE: u32 = 100;
    /// Explosion left behind by a shot-down bomb, a boss hit or an absorbed hit
    pub const SMALL_EXPLOSION_LIFE: u32 = 50;
    /// Explosion sprite half-extent
    pub const EXPLOSION_HALF_SIZE: f32 = 32.0;

    /// Number of distinct bomb colors the renderer knows about
    pub const BOMB_PALETTE_SIZE: u8 = 6;
}
