//! Per-tick movement
//!
//! Every entity moves by `vel * speed * dt`; what differs per category is
//! what happens at the edges:
//! - player: the whole move is undone if it would leave the field
//! - enemy: descends until its stop line, then holds
//! - minion boss: bounces inside its box
//! - projectiles: fly straight and are culled once outside the field
//! - explosions: count down one whole tick per call, whatever `dt`, and expire

use glam::Vec2;

use super::geometry::Bounds;
use super::state::{Enemy, EnemyMotion, GamePhase, GameState, MinionBoss, Player};

/// Move the player by `intent * speed * dt`, reverting if any axis leaves the field.
///
/// `intent` is the sum of the active direction inputs. Returns whether the
/// player actually moved.
pub fn move_player(
    player: &mut Player,
    bounds: &Bounds,
    intent: Vec2,
    speed: f32,
    dt: f32,
) -> bool {
    if intent != Vec2::ZERO {
        player.facing = intent;
    }
    player.body.speed = speed;

    let moved = player.body.rect.translated(intent * speed * dt);
    if intent == Vec2::ZERO || !bounds.contains_fully(&moved) {
        player.body.vel = Vec2::ZERO;
        return false;
    }
    player.body.vel = intent;
    player.body.rect = moved;
    true
}

/// Descend until the stop line, then hold with zero velocity
pub fn advance_enemy(enemy: &mut Enemy, dt: f32) {
    if enemy.motion == EnemyMotion::Descending && enemy.body.center().y >= enemy.stop_y {
        enemy.motion = EnemyMotion::Holding;
        enemy.body.vel = Vec2::ZERO;
    }
    enemy.body.advance(dt);
}

/// Flip velocity components at the box edges, then move
pub fn advance_minion(minion: &mut MinionBoss, dt: f32) {
    let center = minion.body.center();
    let (top, bottom) = (minion.y_bounds.x, minion.y_bounds.y);
    if center.y > bottom || center.y < top {
        minion.body.vel.y = -minion.body.vel.y;
    }
    let left = minion.home_x - minion.x_offsets.x;
    let right = minion.home_x + minion.x_offsets.y;
    if center.x > right || center.x < left {
        minion.body.vel.x = -minion.body.vel.x;
    }
    minion.body.advance(dt);
}

/// What the movement pass removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementReport {
    /// Projectiles that left the field
    pub culled: usize,
    /// Explosions that ran out
    pub expired: usize,
}

/// Advance every non-player entity by one step. Motion scales by `dt`;
/// explosion life is a tick count and drops by one regardless.
pub fn update(state: &mut GameState, dt: f32) -> MovementReport {
    let bounds = state.bounds;
    let reg = &mut state.registry;

    // Enemies hold position while the boss is out
    if state.phase == GamePhase::Wave {
        for (_, enemy) in reg.enemies.iter_mut() {
            advance_enemy(enemy, dt);
        }
    }

    for (_, minion) in reg.minions.iter_mut() {
        advance_minion(minion, dt);
    }

    let mut out_of_bounds = Vec::new();
    for (id, threat) in reg.threats.iter_mut() {
        threat.body.advance(dt);
        if !bounds.contains_fully(&threat.body.rect) {
            out_of_bounds.push(id);
        }
    }
    let mut culled = 0;
    for id in out_of_bounds.drain(..) {
        culled += usize::from(reg.threats.mark_dead(id));
    }

    for (id, weapon) in reg.weapons.iter_mut() {
        weapon.body.advance(dt);
        if !bounds.contains_fully(&weapon.body.rect) {
            out_of_bounds.push(id);
        }
    }
    for id in out_of_bounds.drain(..) {
        culled += usize::from(reg.weapons.mark_dead(id));
    }

    let mut spent = Vec::new();
    for (id, effect) in reg.effects.iter_mut() {
        effect.life = effect.life.saturating_sub(1);
        if effect.life == 0 {
            spent.push(id);
        }
    }
    let mut expired = 0;
    for id in spent {
        expired += usize::from(reg.effects.mark_dead(id));
    }

    if culled > 0 {
        log::debug!("tick {}: culled {} projectiles", state.time_ticks, culled);
    }
    MovementReport { culled, expired }
}
