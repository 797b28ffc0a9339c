//! Spawn scheduling
//!
//! Timers are evaluated against the tick counter before it advances, so a
//! fresh run spawns its first enemy on tick 0. Each entity draws its own
//! random parameters once, at creation.

use glam::Vec2;
use rand::Rng;

use super::geometry::direction;
use super::registry::{EntityId, Registry};
use super::state::{
    Body, Boss, Enemy, EnemyMotion, GamePhase, GameState, MinionBoss, ThreatKind, ThreatProjectile,
};
use crate::consts::BOMB_PALETTE_SIZE;
use crate::tuning::{BombTuning, Tuning};

/// Whether a timer with period `interval` fires on `tick`; a zero period never fires
fn due(tick: u64, interval: u64) -> bool {
    tick.checked_rem(interval) == Some(0)
}

/// Unit aim from `from` to `to`; straight down the field if they coincide
pub fn aim(from: Vec2, to: Vec2) -> Vec2 {
    direction(from, to).unwrap_or_else(|err| {
        log::warn!("{err}; aiming straight down");
        Vec2::Y
    })
}

/// Place a new enemy at the top of the field
pub fn spawn_enemy(reg: &mut Registry, tuning: &Tuning, rng: &mut impl Rng) -> EntityId {
    let x = rng.random_range(0.0..tuning.field_width);
    let stop_y = tuning.enemy_stop.sample(rng) as f32;
    let drop_interval = tuning.enemy_drop_interval.sample(rng);
    let id = reg.add_enemy(Enemy {
        body: Body::new(
            Vec2::new(x, 0.0),
            tuning.enemy_half_size,
            Vec2::Y,
            tuning.enemy_speed,
        ),
        stop_y,
        motion: EnemyMotion::Descending,
        drop_interval,
    });
    log::debug!("enemy {:?} at x={x:.0}, stops at y={stop_y:.0}, drops every {drop_interval}", id);
    id
}

/// Drop a bomb from the spawner's bottom edge, aimed at `target` once and for all
pub fn drop_threat(
    reg: &mut Registry,
    kind: ThreatKind,
    spawner: &Body,
    target: Vec2,
    params: &BombTuning,
    rng: &mut impl Rng,
) -> EntityId {
    let radius = params.radius.sample(rng) as f32;
    let palette = rng.random_range(0..BOMB_PALETTE_SIZE);
    let origin = Vec2::new(spawner.center().x, spawner.rect.bottom());
    let heading = aim(spawner.center(), target);
    reg.add_threat(ThreatProjectile::new(
        kind,
        origin,
        heading,
        params.speed,
        radius,
        palette,
    ))
}

/// Boss plus one minion per configured home
pub fn spawn_boss_encounter(
    reg: &mut Registry,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> (EntityId, Vec<EntityId>) {
    let boss = reg.add_boss(Boss {
        body: Body::fixed(tuning.boss_center, tuning.boss_half_size),
        fire_interval: tuning.boss_fire_interval.sample(rng),
        hp: tuning.boss_hp,
    });

    let minions = tuning
        .minion_homes
        .iter()
        .map(|&home_x| {
            reg.add_minion(MinionBoss {
                body: Body::new(
                    Vec2::new(home_x, tuning.minion_start_y),
                    tuning.minion_half_size,
                    tuning.minion_velocity,
                    1.0,
                ),
                home_x,
                x_offsets: tuning.minion_x_offsets,
                y_bounds: tuning.minion_y_bounds,
                fire_interval: tuning.minion_fire_interval.sample(rng),
            })
        })
        .collect::<Vec<_>>();

    log::debug!("boss {:?} with {} minions", boss, minions.len());
    (boss, minions)
}

/// What the spawn pass queued
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub enemies: usize,
    pub threats: usize,
}

/// Run every spawn timer for the current tick. Spawns are queued, not committed.
pub fn update(state: &mut GameState, tuning: &Tuning, rng: &mut impl Rng) -> SpawnReport {
    let tick = state.time_ticks;
    let target = state.registry.player.body.center();
    let reg = &mut state.registry;
    let mut report = SpawnReport::default();

    // (variant, spawner) pairs whose timer fired this tick
    let mut droppers: Vec<(ThreatKind, Body)> = Vec::new();

    match state.phase {
        GamePhase::Wave => {
            if due(tick, tuning.enemy_spawn_interval) {
                spawn_enemy(reg, tuning, rng);
                report.enemies += 1;
            }
            droppers.extend(
                reg.enemies
                    .iter()
                    .filter(|(_, e)| e.motion == EnemyMotion::Holding)
                    .filter(|(_, e)| due(tick, e.drop_interval.into()))
                    .map(|(_, e)| (ThreatKind::Bomb, e.body)),
            );
        }
        GamePhase::BossEncounter => {
            droppers.extend(
                reg.bosses
                    .iter()
                    .filter(|(_, b)| due(tick, b.fire_interval.into()))
                    .map(|(_, b)| (ThreatKind::BossBomb, b.body)),
            );
            droppers.extend(
                reg.minions
                    .iter()
                    .filter(|(_, m)| due(tick, m.fire_interval.into()))
                    .map(|(_, m)| (ThreatKind::MinionBomb, m.body)),
            );
        }
        GamePhase::GameOver => {}
    }

    for (kind, spawner) in droppers {
        let params = match kind {
            ThreatKind::Bomb => &tuning.bomb,
            ThreatKind::BossBomb => &tuning.boss_bomb,
            ThreatKind::MinionBomb => &tuning.minion_bomb,
        };
        drop_threat(reg, kind, &spawner, target, params, rng);
        report.threats += 1;
    }

    report
}
