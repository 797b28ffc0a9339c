//! Fixed timestep simulation tick
//!
//! The engine owns the game state, its RNG stream and its tuning. One call
//! to [`Engine::tick`] runs the passes in a fixed order:
//! player, spawn, movement, collision, phase. Additions are committed
//! between passes and dead entities are swept at the end. What the passes
//! report is handed to the host as [`GameEvent`]s on the frame.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionReport;
use super::error::SimError;
use super::geometry::Rect;
use super::phase::PhaseChange;
use super::player::PlayerReport;
use super::spawn::SpawnReport;
use super::state::{GamePhase, GameState, PowerState, RunOutcome, ThreatKind, WeaponTier};
use super::{collision, kinematics, phase, player, spawn};
use crate::tuning::{Tuning, TuningError};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Release the banked charge as a shot
    pub fire: bool,
    /// Bank one charge press
    pub charge: bool,
    /// Speed boost while held
    pub boost: bool,
    /// Spend score to become empowered
    pub empower: bool,
}

/// What a draw request depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawKind {
    Player,
    Enemy,
    Boss,
    MinionBoss,
    Bomb,
    BossBomb,
    MinionBomb,
    Beam,
    Explosion,
}

impl From<ThreatKind> for DrawKind {
    fn from(kind: ThreatKind) -> Self {
        match kind {
            ThreatKind::Bomb => DrawKind::Bomb,
            ThreatKind::BossBomb => DrawKind::BossBomb,
            ThreatKind::MinionBomb => DrawKind::MinionBomb,
        }
    }
}

/// One sprite for the host to draw. `variant` is opaque to the core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawRequest {
    pub kind: DrawKind,
    pub center: Vec2,
    pub half_size: Vec2,
    pub variant: u8,
}

/// Something that happened during a tick, for sounds and banners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Empowered,
    PowerExpired,
    ShotFired(WeaponTier),
    EnemySpawned,
    ThreatDropped,
    EnemyDestroyed,
    ThreatDestroyed,
    BossHit,
    /// A threat burst against the empowered player
    Absorbed,
    Phase(PhaseChange),
}

/// Flatten the pass reports into events, in pass order
fn events(
    player: &PlayerReport,
    spawned: &SpawnReport,
    collisions: &CollisionReport,
    change: Option<PhaseChange>,
) -> Vec<GameEvent> {
    let mut out = Vec::new();
    let mut repeat = |event: GameEvent, n: u32| out.extend((0..n).map(|_| event));

    repeat(GameEvent::Empowered, u32::from(player.empowered));
    if let Some((_, tier)) = player.fired {
        repeat(GameEvent::ShotFired(tier), 1);
    }
    repeat(GameEvent::PowerExpired, u32::from(player.power_expired));
    repeat(GameEvent::EnemySpawned, spawned.enemies as u32);
    repeat(GameEvent::ThreatDropped, spawned.threats as u32);
    repeat(GameEvent::EnemyDestroyed, collisions.enemies_destroyed);
    repeat(GameEvent::ThreatDestroyed, collisions.threats_destroyed);
    repeat(GameEvent::BossHit, collisions.boss_hits);
    repeat(GameEvent::Absorbed, collisions.absorbed);
    if let Some(change) = change {
        repeat(GameEvent::Phase(change), 1);
    }
    out
}

/// Whether the host should keep ticking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    Continue,
    GameOver { final_score: i64, outcome: RunOutcome },
}

/// Everything the host needs after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Ticks processed so far
    pub tick: u64,
    pub score: i64,
    pub phase: GamePhase,
    pub outcome: TickOutcome,
    /// Every live entity, player first, then by category in id order
    pub draws: Vec<DrawRequest>,
    pub boss_hp: Option<i32>,
    pub charge: i32,
    /// Tier a shot fired now would have
    pub beam_tier: WeaponTier,
    pub power: PowerState,
    /// What happened during the tick that produced this frame
    pub events: Vec<GameEvent>,
}

impl Frame {
    pub fn is_over(&self) -> bool {
        matches!(self.outcome, TickOutcome::GameOver { .. })
    }
}

/// Owns a run from the first tick to game over
#[derive(Debug, Clone)]
pub struct Engine {
    state: GameState,
    rng: Pcg32,
    tuning: Tuning,
    /// Events of the last processed tick
    events: Vec<GameEvent>,
}

impl Engine {
    fn start(state: GameState, tuning: Tuning, seed: u64) -> Self {
        Self {
            state,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            events: Vec::new(),
        }
    }

    /// Start a run. Rejects tuning that fails [`Tuning::validate`].
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        log::info!("new run, seed {seed}");
        Ok(Self::start(GameState::new(&tuning), tuning, seed))
    }

    pub fn with_defaults(seed: u64) -> Self {
        let tuning = Tuning::default();
        Self::start(GameState::new(&tuning), tuning, seed)
    }

    /// Continue from a saved state. The RNG is not part of a snapshot, so
    /// a resumed run only replays identically under the same seed.
    pub fn resume(state: GameState, tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        log::info!("resuming run at tick {}, seed {seed}", state.time_ticks);
        Ok(Self::start(state, tuning, seed))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Advance one fixed timestep. After game over this is a no-op that
    /// keeps returning the terminal frame. An error leaves the state as it
    /// was before the call.
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Result<Frame, SimError> {
        if self.state.is_over() {
            return Ok(self.frame());
        }

        let acted = player::update(&mut self.state, input, &self.tuning, dt)?;
        let spawned = spawn::update(&mut self.state, &self.tuning, &mut self.rng);
        self.state.registry.commit();

        kinematics::update(&mut self.state, dt);
        let collisions = collision::resolve(&mut self.state);
        self.state.registry.commit();

        let change = phase::update(&mut self.state, &collisions, &self.tuning, &mut self.rng);
        self.state.registry.commit();
        self.state.registry.sweep();

        self.state.time_ticks += 1;
        self.events = events(&acted, &spawned, &collisions, change);
        Ok(self.frame())
    }

    /// Snapshot of the current state for the host
    pub fn frame(&self) -> Frame {
        let state = &self.state;
        let player = state.player();
        let outcome = match state.outcome {
            Some(outcome) if state.is_over() => TickOutcome::GameOver {
                final_score: state.score.value(),
                outcome,
            },
            _ => TickOutcome::Continue,
        };
        Frame {
            tick: state.time_ticks,
            score: state.score.value(),
            phase: state.phase,
            outcome,
            draws: draw_list(state),
            boss_hp: state.boss_hp(),
            charge: player.charge,
            beam_tier: WeaponTier::for_charge(
                player.charge.max(0),
                self.tuning.charged_threshold,
                self.tuning.super_threshold,
            ),
            power: player.power,
            events: self.events.clone(),
        }
    }
}

fn draw_list(state: &GameState) -> Vec<DrawRequest> {
    let reg = &state.registry;
    let mut draws = Vec::with_capacity(reg.live_count() + 1);
    let req = |kind: DrawKind, rect: Rect, variant: u8| DrawRequest {
        kind,
        center: rect.center,
        half_size: rect.half,
        variant,
    };

    draws.push(req(
        DrawKind::Player,
        reg.player.body.rect,
        u8::from(reg.player.is_empowered()),
    ));
    // 1 on the left half, where the sprite is mirrored
    let half_width = state.bounds.width / 2.0;
    draws.extend(reg.enemies.iter().map(|(_, e)| {
        let mirrored = u8::from(e.body.center().x < half_width);
        req(DrawKind::Enemy, e.body.rect, mirrored)
    }));
    draws.extend(reg.bosses.iter().map(|(_, b)| req(DrawKind::Boss, b.body.rect, 0)));
    draws.extend(
        reg.minions
            .iter()
            .map(|(_, m)| req(DrawKind::MinionBoss, m.body.rect, 0)),
    );
    draws.extend(
        reg.threats
            .iter()
            .map(|(_, t)| req(DrawKind::from(t.kind), t.body.rect, t.palette)),
    );
    draws.extend(
        reg.weapons
            .iter()
            .map(|(_, w)| req(DrawKind::Beam, w.body.rect, w.tier.variant())),
    );
    draws.extend(
        reg.effects
            .iter()
            .map(|(_, x)| req(DrawKind::Explosion, x.body.rect, x.frame())),
    );
    draws
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::score::Score;
    use crate::sim::state::{Body, Enemy, EnemyMotion, ThreatProjectile, WeaponProjectile};
    use crate::tuning::Span;

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_first_tick_spawns_enemy() {
        let mut engine = Engine::with_defaults(12345);
        let frame = engine.tick(&idle(), SIM_DT).unwrap();
        assert_eq!(frame.tick, 1);
        assert_eq!(frame.outcome, TickOutcome::Continue);
        assert_eq!(frame.phase, GamePhase::Wave);
        let enemies = frame.draws.iter().filter(|d| d.kind == DrawKind::Enemy).count();
        assert_eq!(enemies, 1);
        assert_eq!(frame.draws[0].kind, DrawKind::Player);
    }

    #[test]
    fn test_tick_counter_monotonic() {
        let mut engine = Engine::with_defaults(1);
        let mut last = 0;
        for _ in 0..50 {
            let frame = engine.tick(&idle(), SIM_DT).unwrap();
            assert_eq!(frame.tick, last + 1);
            last = frame.tick;
        }
    }

    #[test]
    fn test_determinism() {
        let script: Vec<TickInput> = (0..600)
            .map(|i| TickInput {
                left: i % 120 < 60,
                right: i % 120 >= 60,
                charge: i % 3 == 0,
                fire: i % 25 == 0,
                ..Default::default()
            })
            .collect();

        let run = |seed| {
            let mut engine = Engine::with_defaults(seed);
            script
                .iter()
                .map(|input| engine.tick(input, SIM_DT).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_beam_fired_and_drawn() {
        let mut engine = Engine::with_defaults(5);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let frame = engine.tick(&fire, SIM_DT).unwrap();
        let beam = frame
            .draws
            .iter()
            .find(|d| d.kind == DrawKind::Beam)
            .unwrap();
        // Spawned at y=761, then moved 10 up in the same tick
        assert_eq!(beam.center, Vec2::new(800.0, 751.0));
        assert_eq!(beam.variant, 0);
        assert_eq!(frame.charge, 0);
        assert_eq!(
            frame.events,
            vec![GameEvent::ShotFired(WeaponTier::Basic), GameEvent::EnemySpawned]
        );
    }

    #[test]
    fn test_charge_readout() {
        let mut engine = Engine::with_defaults(5);
        let charge = TickInput {
            charge: true,
            ..Default::default()
        };
        let mut frame = engine.tick(&charge, SIM_DT).unwrap();
        for _ in 0..9 {
            frame = engine.tick(&charge, SIM_DT).unwrap();
        }
        assert_eq!(frame.charge, 10);
        assert_eq!(frame.beam_tier, WeaponTier::Charged);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut engine = Engine::with_defaults(3);
        let center = engine.state.player().body.center();
        engine.state.registry.add_threat(ThreatProjectile::new(
            ThreatKind::Bomb,
            center,
            Vec2::Y,
            0.0,
            10.0,
            0,
        ));
        engine.state.registry.commit();
        engine.state.score = Score::new(7);

        let frame = engine.tick(&idle(), SIM_DT).unwrap();
        let over = TickOutcome::GameOver {
            final_score: 7,
            outcome: RunOutcome::Defeated,
        };
        assert_eq!(frame.outcome, over);
        assert_eq!(frame.phase, GamePhase::GameOver);
        assert!(frame
            .events
            .contains(&GameEvent::Phase(PhaseChange::RunEnded(RunOutcome::Defeated))));

        let again = engine.tick(&idle(), SIM_DT).unwrap();
        assert_eq!(again, frame);
    }

    #[test]
    fn test_boss_hp_readout() {
        let mut engine = Engine::with_defaults(3);
        engine.state.score = Score::new(21);
        let frame = engine.tick(&idle(), SIM_DT).unwrap();
        assert_eq!(frame.phase, GamePhase::BossEncounter);
        assert_eq!(frame.boss_hp, Some(150));
        assert!(frame
            .events
            .contains(&GameEvent::Phase(PhaseChange::BossEncounterStarted)));
        assert_eq!(
            frame.draws.iter().filter(|d| d.kind == DrawKind::MinionBoss).count(),
            2
        );
    }

    #[test]
    fn test_negative_charge_propagates() {
        let mut engine = Engine::with_defaults(3);
        engine.state.registry.player.charge = -5;
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        assert_eq!(
            engine.tick(&fire, SIM_DT),
            Err(SimError::InvalidChargeFire { charge: -5 })
        );
        assert_eq!(engine.state().time_ticks, 0);
        assert!(engine.frame().events.is_empty());
    }

    #[test]
    fn test_empowered_player_variant() {
        let mut engine = Engine::with_defaults(3);
        engine.state.score = Score::new(100);
        // Keep the boss out of the way
        engine.state.boss_encounter_started = true;
        let empower = TickInput {
            empower: true,
            ..Default::default()
        };
        let frame = engine.tick(&empower, SIM_DT).unwrap();
        assert_eq!(frame.power, PowerState::Empowered);
        assert_eq!(frame.draws[0].variant, 1);
        assert_eq!(frame.score, 0);
    }

    #[test]
    fn test_weapon_variant_tracks_tier() {
        let mut engine = Engine::with_defaults(3);
        engine
            .state
            .registry
            .add_weapon(WeaponProjectile::new(Vec2::new(100.0, 500.0), 10.0, WeaponTier::Super));
        engine.state.registry.commit();
        let frame = engine.tick(&idle(), SIM_DT).unwrap();
        let beam = frame.draws.iter().find(|d| d.kind == DrawKind::Beam).unwrap();
        assert_eq!(beam.variant, 2);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let tuning = Tuning {
            enemy_stop: Span::new(600, 50),
            ..Default::default()
        };
        assert!(matches!(
            Engine::new(tuning.clone(), 1),
            Err(TuningError::Invalid(_))
        ));
        let state = GameState::new(&Tuning::default());
        assert!(Engine::resume(state, tuning, 1).is_err());
        assert!(Engine::new(Tuning::default(), 1).is_ok());
    }

    #[test]
    fn test_enemy_variant_mirrors_left_half() {
        let mut engine = Engine::with_defaults(3);
        for x in [200.0, 1400.0] {
            engine.state.registry.add_enemy(Enemy {
                body: Body::fixed(Vec2::new(x, 300.0), Vec2::splat(32.0)),
                stop_y: 300.0,
                motion: EnemyMotion::Holding,
                drop_interval: 1000,
            });
        }
        engine.state.registry.commit();
        engine.state.time_ticks = 1;
        let frame = engine.tick(&idle(), SIM_DT).unwrap();
        let variants: Vec<(f32, u8)> = frame
            .draws
            .iter()
            .filter(|d| d.kind == DrawKind::Enemy)
            .map(|d| (d.center.x, d.variant))
            .collect();
        assert_eq!(variants, vec![(200.0, 1), (1400.0, 0)]);
    }

    #[test]
    fn test_events_report_kills_and_spawns() {
        let mut engine = Engine::with_defaults(3);
        engine.state.registry.add_enemy(Enemy {
            body: Body::fixed(Vec2::new(400.0, 300.0), Vec2::splat(32.0)),
            stop_y: 300.0,
            motion: EnemyMotion::Holding,
            drop_interval: 1000,
        });
        engine
            .state
            .registry
            .add_weapon(WeaponProjectile::new(Vec2::new(400.0, 330.0), 10.0, WeaponTier::Basic));
        engine.state.registry.commit();
        engine.state.time_ticks = 1;
        let frame = engine.tick(&idle(), SIM_DT).unwrap();
        assert_eq!(frame.events, vec![GameEvent::EnemyDestroyed]);

        // A quiet tick clears them
        let frame = engine.tick(&idle(), SIM_DT).unwrap();
        assert!(frame.events.is_empty());
    }
}
