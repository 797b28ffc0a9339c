//! Game balance table
//!
//! Every knob the simulation reads lives here so a run can be retuned from a
//! JSON file without rebuilding. Missing fields fall back to the defaults.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive integer range sampled once per entity at spawn time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub min: u32,
    pub max: u32,
}

impl Span {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut impl Rng) -> u32 {
        rng.random_range(self.min..=self.max)
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// What happens once the boss runs out of hit points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BossDefeatPolicy {
    /// The run ends with a win
    #[default]
    Victory,
    /// Boss and minions are cleared and ordinary waves resume
    ResumeWave,
}

/// Per-variant bomb parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BombTuning {
    /// Radius in pixels, drawn per bomb
    pub radius: Span,
    /// Pixels per tick along the aim direction
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play field ===
    pub field_width: f32,
    pub field_height: f32,
    /// When false, move-up/move-down inputs are ignored
    pub vertical_movement: bool,

    // === Player ===
    pub player_start: Vec2,
    pub player_half_size: Vec2,
    pub player_speed: f32,
    /// Speed while the boost input is held
    pub player_boost_speed: f32,
    /// Score spent to become Empowered
    pub empower_cost: i64,
    pub empower_ticks: i32,
    /// Charge count at which fire produces a Charged beam
    pub charged_threshold: i32,
    /// Charge count at which fire produces a Super beam
    pub super_threshold: i32,
    pub beam_speed: f32,

    // === Wave enemies ===
    pub enemy_spawn_interval: u64,
    pub enemy_half_size: Vec2,
    pub enemy_speed: f32,
    /// Center y at which a descending enemy stops
    pub enemy_stop: Span,
    pub enemy_drop_interval: Span,
    pub bomb: BombTuning,

    // === Boss encounter ===
    /// Score that must be exceeded to start the boss encounter
    pub boss_score_threshold: i64,
    pub boss_hp: i32,
    pub boss_center: Vec2,
    pub boss_half_size: Vec2,
    pub boss_fire_interval: Span,
    pub boss_bomb: BombTuning,
    pub boss_defeat: BossDefeatPolicy,

    // === Minion bosses ===
    /// Home x of each minion; one minion per entry
    pub minion_homes: Vec<f32>,
    pub minion_start_y: f32,
    pub minion_half_size: Vec2,
    pub minion_velocity: Vec2,
    /// (top, bottom) center-y bounds
    pub minion_y_bounds: Vec2,
    /// (left, right) offsets from home x
    pub minion_x_offsets: Vec2,
    pub minion_fire_interval: Span,
    pub minion_bomb: BombTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        let field_width = 1600.0;
        let field_height = 900.0;
        Self {
            field_width,
            field_height,
            vertical_movement: true,

            player_start: Vec2::new(800.0, 825.0),
            player_half_size: Vec2::new(32.0, 32.0),
            player_speed: 10.0,
            player_boost_speed: 20.0,
            empower_cost: 100,
            empower_ticks: 500,
            charged_threshold: 10,
            super_threshold: 20,
            beam_speed: 10.0,

            enemy_spawn_interval: 200,
            enemy_half_size: Vec2::new(32.0, 32.0),
            enemy_speed: 10.0,
            enemy_stop: Span::new(50, 550),
            enemy_drop_interval: Span::new(50, 300),
            bomb: BombTuning {
                radius: Span::new(10, 50),
                speed: 8.0,
            },

            boss_score_threshold: 20,
            boss_hp: 150,
            boss_center: Vec2::new(field_width / 2.0, field_height / 3.0),
            boss_half_size: Vec2::new(120.0, 120.0),
            boss_fire_interval: Span::new(100, 300),
            boss_bomb: BombTuning {
                radius: Span::new(100, 150),
                speed: 4.0,
            },
            boss_defeat: BossDefeatPolicy::Victory,

            minion_homes: vec![200.0, 1200.0],
            minion_start_y: 100.0,
            minion_half_size: Vec2::new(30.0, 30.0),
            minion_velocity: Vec2::new(5.0, 5.0),
            minion_y_bounds: Vec2::new(100.0, 450.0),
            minion_x_offsets: Vec2::new(100.0, 250.0),
            minion_fire_interval: Span::new(20, 100),
            minion_bomb: BombTuning {
                radius: Span::new(10, 30),
                speed: 8.0,
            },
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON balance table
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a balance table from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject tables the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(TuningError::Invalid("play field must have positive size"));
        }
        if self.enemy_spawn_interval == 0 {
            return Err(TuningError::Invalid("enemy_spawn_interval must be non-zero"));
        }
        let intervals = [
            self.enemy_drop_interval,
            self.boss_fire_interval,
            self.minion_fire_interval,
        ];
        if intervals.iter().any(|span| span.min == 0) {
            return Err(TuningError::Invalid("fire intervals must be non-zero"));
        }
        let spans = [
            self.enemy_stop,
            self.enemy_drop_interval,
            self.boss_fire_interval,
            self.minion_fire_interval,
            self.bomb.radius,
            self.boss_bomb.radius,
            self.minion_bomb.radius,
        ];
        if spans.iter().any(|span| span.min > span.max) {
            return Err(TuningError::Invalid("range min exceeds max"));
        }
        if self.minion_y_bounds.x > self.minion_y_bounds.y {
            return Err(TuningError::Invalid("minion_y_bounds must be (top, bottom)"));
        }
        if self.charged_threshold > self.super_threshold {
            return Err(TuningError::Invalid(
                "charged_threshold exceeds super_threshold",
            ));
        }
        Ok(())
    }
}

/// Errors raised while loading a balance table
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "failed to read tuning file: {e}"),
            TuningError::Parse(e) => write!(f, "malformed tuning JSON: {e}"),
            TuningError::Invalid(reason) => write!(f, "invalid tuning: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(e) => Some(e),
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}
