//! Collision resolution
//!
//! Rules run in a fixed order. Each rule first gathers every overlapping
//! pair among entities that are still alive, then applies its effects, so
//! nothing is mutated while a pool is being scanned. `mark_dead` reports
//! whether it actually killed something; that is what keeps a target hit by
//! two shots from being scored twice.

use glam::Vec2;

use super::geometry::Rect;
use super::registry::{EntityId, Registry};
use super::score::{ABSORB_POINTS, ENEMY_POINTS, THREAT_POINTS};
use super::state::{Explosion, GameState, WeaponTier};
use crate::consts::{ENEMY_EXPLOSION_LIFE, SMALL_EXPLOSION_LIFE};

/// What the collision pass did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub enemies_destroyed: u32,
    pub threats_destroyed: u32,
    pub boss_hits: u32,
    /// Threats soaked up by an empowered player
    pub absorbed: u32,
    /// An unpowered player was hit
    pub lethal: bool,
}

impl CollisionReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Every `(a, b)` whose rects overlap, in id order of `a` then `b`
fn overlapping<A: Copy, B: Copy>(a: &[(A, Rect)], b: &[(B, Rect)]) -> Vec<(A, B)> {
    let mut pairs = Vec::new();
    for (a_id, a_rect) in a {
        for (b_id, b_rect) in b {
            if a_rect.overlaps(b_rect) {
                pairs.push((*a_id, *b_id));
            }
        }
    }
    pairs
}

fn live_weapons(reg: &Registry) -> Vec<((EntityId, WeaponTier), Rect)> {
    reg.weapons
        .iter()
        .map(|(id, w)| ((id, w.tier), w.body.rect))
        .collect()
}

/// Resolve all overlaps for this tick. Explosions are queued, not committed.
pub fn resolve(state: &mut GameState) -> CollisionReport {
    let tick = state.time_ticks;
    let mut report = CollisionReport::default();
    let GameState {
        registry: reg,
        score,
        ..
    } = state;

    // Enemy vs weapon
    let enemies: Vec<_> = reg.enemies.iter().map(|(id, e)| (id, e.body.rect)).collect();
    let weapons = live_weapons(reg);
    for (enemy, (weapon, tier)) in overlapping(&enemies, &weapons) {
        if let Some(center) = reg.enemies.get(enemy).map(|e| e.body.center()) {
            reg.enemies.mark_dead(enemy);
            reg.add_effect(Explosion::new(center, ENEMY_EXPLOSION_LIFE));
            score.add(ENEMY_POINTS);
            report.enemies_destroyed += 1;
        }
        if !tier.pierces() {
            reg.weapons.mark_dead(weapon);
        }
    }

    // Threat vs weapon
    let threats: Vec<_> = reg.threats.iter().map(|(id, t)| (id, t.body.rect)).collect();
    let weapons = live_weapons(reg);
    for (threat, (weapon, tier)) in overlapping(&threats, &weapons) {
        if let Some(center) = reg.threats.get(threat).map(|t| t.body.center()) {
            reg.threats.mark_dead(threat);
            reg.add_effect(Explosion::new(center, SMALL_EXPLOSION_LIFE));
            score.add(THREAT_POINTS);
            report.threats_destroyed += 1;
        }
        if !tier.pierces() {
            reg.weapons.mark_dead(weapon);
        }
    }

    // Boss vs weapon: every tier is spent on the boss
    let bosses: Vec<_> = reg.bosses.iter().map(|(id, b)| (id, b.body.rect)).collect();
    let weapons = live_weapons(reg);
    for (boss, (weapon, _)) in overlapping(&bosses, &weapons) {
        if !reg.weapons.mark_dead(weapon) {
            continue;
        }
        if let Some(b) = reg.bosses.get_mut(boss) {
            b.hp -= 1;
            let center = b.body.center();
            reg.add_effect(Explosion::new(center, SMALL_EXPLOSION_LIFE));
            report.boss_hits += 1;
        }
    }

    // Player vs threat
    let player_rect = reg.player.body.rect;
    let empowered = reg.player.is_empowered();
    let hits: Vec<(EntityId, Vec2)> = reg
        .threats
        .iter()
        .filter(|(_, t)| t.body.rect.overlaps(&player_rect))
        .map(|(id, t)| (id, t.body.center()))
        .collect();
    for (threat, center) in hits {
        if !reg.threats.mark_dead(threat) {
            continue;
        }
        if empowered {
            reg.add_effect(Explosion::new(center, SMALL_EXPLOSION_LIFE));
            score.add(ABSORB_POINTS);
            report.absorbed += 1;
        } else {
            report.lethal = true;
        }
    }

    if !report.is_empty() {
        log::debug!("tick {tick}: {report:?}");
    }
    report
}
