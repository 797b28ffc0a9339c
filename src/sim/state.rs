//! Game state and core simulation types
//!
//! Everything a host needs to snapshot a run lives here. The RNG stream is
//! held by the engine, not the state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Bounds, Rect};
use super::registry::Registry;
use super::score::Score;
use crate::consts::{BOMB_PALETTE_SIZE, EXPLOSION_HALF_SIZE};
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ordinary enemies descend and drop bombs
    Wave,
    /// Boss and minion bosses are on the field
    BossEncounter,
    /// Run ended
    GameOver,
}

/// How a finished run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The player was hit while not empowered
    Defeated,
    /// The boss ran out of hit points
    Victory,
}

/// Shape and motion shared by every entity
///
/// Motion is `center += vel * speed * dt`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub rect: Rect,
    pub vel: Vec2,
    pub speed: f32,
}

impl Body {
    pub fn new(center: Vec2, half: Vec2, vel: Vec2, speed: f32) -> Self {
        Self {
            rect: Rect::new(center, half),
            vel,
            speed,
        }
    }

    /// A body that never moves
    pub fn fixed(center: Vec2, half: Vec2) -> Self {
        Self::new(center, half, Vec2::ZERO, 0.0)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect.center
    }

    #[inline]
    pub fn displacement(&self, dt: f32) -> Vec2 {
        self.vel * self.speed * dt
    }

    pub fn advance(&mut self, dt: f32) {
        self.rect.center += self.displacement(dt);
    }
}

/// Player power state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerState {
    #[default]
    Normal,
    /// Threat hits are absorbed for score instead of ending the run
    Empowered,
}

/// The player's craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Summed direction of the last non-zero movement input
    pub facing: Vec2,
    pub power: PowerState,
    /// Ticks left while empowered; negative once expired
    pub empower_ticks: i32,
    /// Charge presses since the last shot
    pub charge: i32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            body: Body::new(
                tuning.player_start,
                tuning.player_half_size,
                Vec2::ZERO,
                tuning.player_speed,
            ),
            facing: Vec2::NEG_Y,
            power: PowerState::Normal,
            empower_ticks: -1,
            charge: 0,
        }
    }

    pub fn is_empowered(&self) -> bool {
        self.power == PowerState::Empowered
    }
}

/// Descending enemy motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyMotion {
    Descending,
    /// Parked at its stop line; only now does it drop bombs
    Holding,
}

/// An ordinary wave enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    /// Center y at which descent stops
    pub stop_y: f32,
    pub motion: EnemyMotion,
    /// Ticks between bomb drops while holding
    pub drop_interval: u32,
}

/// The boss; one per encounter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub body: Body,
    pub fire_interval: u32,
    pub hp: i32,
}

/// A minion boss bouncing inside a box around its home x
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinionBoss {
    pub body: Body,
    pub home_x: f32,
    /// (left, right) offsets from `home_x`
    pub x_offsets: Vec2,
    /// (top, bottom) center-y bounds
    pub y_bounds: Vec2,
    pub fire_interval: u32,
}

/// Threat projectile variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatKind {
    /// Dropped by wave enemies
    Bomb,
    /// Dropped by the boss
    BossBomb,
    /// Dropped by minion bosses
    MinionBomb,
}

/// A projectile that ends the run when it reaches an unpowered player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatProjectile {
    /// `vel` is the unit aim captured at spawn
    pub body: Body,
    pub kind: ThreatKind,
    pub radius: f32,
    /// Opaque color index for the renderer
    pub palette: u8,
}

impl ThreatProjectile {
    pub fn new(
        kind: ThreatKind,
        center: Vec2,
        aim: Vec2,
        speed: f32,
        radius: f32,
        palette: u8,
    ) -> Self {
        Self {
            body: Body {
                rect: Rect::around_circle(center, radius),
                vel: aim,
                speed,
            },
            kind,
            radius,
            palette: palette % BOMB_PALETTE_SIZE,
        }
    }

    #[inline]
    pub fn aim(&self) -> Vec2 {
        self.body.vel
    }
}

/// Weapon power tier, fixed when the shot is fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponTier {
    Basic,
    Charged,
    Super,
}

impl WeaponTier {
    /// Tier produced by firing with `charge` presses banked
    pub fn for_charge(charge: i32, charged_threshold: i32, super_threshold: i32) -> Self {
        if charge >= super_threshold {
            WeaponTier::Super
        } else if charge >= charged_threshold {
            WeaponTier::Charged
        } else {
            WeaponTier::Basic
        }
    }

    /// Charged shots survive their hits and keep going
    pub fn pierces(&self) -> bool {
        *self != WeaponTier::Basic
    }

    pub fn half_size(&self) -> Vec2 {
        match self {
            WeaponTier::Basic => Vec2::new(8.0, 20.0),
            WeaponTier::Charged => Vec2::new(12.0, 30.0),
            WeaponTier::Super => Vec2::new(20.0, 50.0),
        }
    }

    pub fn variant(&self) -> u8 {
        match self {
            WeaponTier::Basic => 0,
            WeaponTier::Charged => 1,
            WeaponTier::Super => 2,
        }
    }
}

/// A player shot travelling straight up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponProjectile {
    pub body: Body,
    pub tier: WeaponTier,
}

impl WeaponProjectile {
    pub fn new(center: Vec2, speed: f32, tier: WeaponTier) -> Self {
        Self {
            body: Body::new(center, tier.half_size(), Vec2::NEG_Y, speed),
            tier,
        }
    }
}

/// Cosmetic explosion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub body: Body,
    /// Ticks left on screen, counted per tick and not scaled by `dt`
    pub life: u32,
}

impl Explosion {
    pub fn new(center: Vec2, life: u32) -> Self {
        Self {
            body: Body::fixed(center, Vec2::splat(EXPLOSION_HALF_SIZE)),
            life,
        }
    }

    /// Two-frame flip animation
    pub fn frame(&self) -> u8 {
        ((self.life / 10) % 2) as u8
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Set once the run is over
    pub outcome: Option<RunOutcome>,
    pub score: Score,
    /// The play field
    pub bounds: Bounds,
    /// All entities
    pub registry: Registry,
    /// Latched when the boss encounter starts; it never starts twice
    pub boss_encounter_started: bool,
}

impl GameState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            time_ticks: 0,
            phase: GamePhase::Wave,
            outcome: None,
            score: Score::default(),
            bounds: Bounds::new(tuning.field_width, tuning.field_height),
            registry: Registry::new(Player::new(tuning)),
            boss_encounter_started: false,
        }
    }

    pub fn player(&self) -> &Player {
        &self.registry.player
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Hit points of the live boss, if any
    pub fn boss_hp(&self) -> Option<i32> {
        self.registry.bosses.iter().next().map(|(_, boss)| boss.hp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let tuning = Tuning::default();
        let state = GameState::new(&tuning);
        assert_eq!(state.phase, GamePhase::Wave);
        assert_eq!(state.score.value(), 0);
        assert_eq!(state.time_ticks, 0);
        assert!(state.outcome.is_none());
        assert_eq!(state.player().body.center(), Vec2::new(800.0, 825.0));
        assert_eq!(state.player().power, PowerState::Normal);
        assert_eq!(state.registry.live_count(), 0);
        assert!(state.boss_hp().is_none());
    }

    #[test]
    fn test_weapon_tier_thresholds() {
        assert_eq!(WeaponTier::for_charge(0, 10, 20), WeaponTier::Basic);
        assert_eq!(WeaponTier::for_charge(9, 10, 20), WeaponTier::Basic);
        assert_eq!(WeaponTier::for_charge(10, 10, 20), WeaponTier::Charged);
        assert_eq!(WeaponTier::for_charge(19, 10, 20), WeaponTier::Charged);
        assert_eq!(WeaponTier::for_charge(20, 10, 20), WeaponTier::Super);
        assert_eq!(WeaponTier::for_charge(500, 10, 20), WeaponTier::Super);
        assert!(!WeaponTier::Basic.pierces());
        assert!(WeaponTier::Charged.pierces());
        assert!(WeaponTier::Super.pierces());
    }

    #[test]
    fn test_explosion_frame_flips() {
        assert_eq!(Explosion::new(Vec2::ZERO, 100).frame(), 0);
        assert_eq!(Explosion::new(Vec2::ZERO, 95).frame(), 1);
        assert_eq!(Explosion::new(Vec2::ZERO, 85).frame(), 0);
    }

    #[test]
    fn test_state_serializes() {
        let state = GameState::new(&Tuning::default());
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, state.phase);
        assert_eq!(back.player().body.center(), state.player().body.center());
    }
}
