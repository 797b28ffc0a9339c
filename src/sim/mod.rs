//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, owned by the engine
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod error;
pub mod geometry;
pub mod kinematics;
pub mod phase;
pub mod pilot;
pub mod player;
pub mod registry;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::CollisionReport;
pub use error::SimError;
pub use geometry::{Bounds, Rect};
pub use phase::PhaseChange;
pub use pilot::autopilot;
pub use registry::{Category, EntityId, Registry};
pub use score::Score;
pub use state::{
    Boss, Enemy, EnemyMotion, Explosion, GamePhase, GameState, MinionBoss, Player, PowerState,
    RunOutcome, ThreatKind, ThreatProjectile, WeaponProjectile, WeaponTier,
};
pub use tick::{DrawKind, DrawRequest, Engine, Frame, GameEvent, TickInput, TickOutcome};
