//! Demo autopilot
//!
//! Produces a `TickInput` from the current state so a headless host can play
//! a full run. Reads state only; it never mutates anything.

use super::state::GameState;
use super::tick::TickInput;
use crate::tuning::Tuning;

/// Vertical reach within which a falling threat counts as incoming
const DANGER_RANGE: f32 = 220.0;
/// Horizontal slack kept around the player when dodging
const DODGE_MARGIN: f32 = 24.0;
/// Charge presses banked before a shot is released
const SHOT_CHARGE: i32 = 12;

/// Pick inputs for the next tick
pub fn autopilot(state: &GameState, tuning: &Tuning) -> TickInput {
    let player = state.player();
    let me = player.body.rect;
    let mut input = TickInput {
        charge: true,
        ..Default::default()
    };

    // Nearest incoming threat above us whose lane overlaps ours
    let incoming = state
        .registry
        .threats
        .iter()
        .map(|(_, t)| t.body.rect)
        .filter(|r| r.bottom() <= me.bottom() && me.top() - r.bottom() < DANGER_RANGE)
        .filter(|r| r.right() + DODGE_MARGIN > me.left() && r.left() - DODGE_MARGIN < me.right())
        .min_by(|a, b| b.bottom().total_cmp(&a.bottom()));

    if let Some(threat) = incoming {
        // Spend score on immunity when a dodge looks hopeless
        if !player.is_empowered() && state.score.value() >= tuning.empower_cost {
            input.empower = true;
        }
        let dodge_left = threat.center.x >= me.center.x;
        let room_left = me.left() > DODGE_MARGIN + threat.half.x * 2.0;
        let room_right = me.right() < state.bounds.width - DODGE_MARGIN - threat.half.x * 2.0;
        if (dodge_left && room_left) || !room_right {
            input.left = true;
        } else {
            input.right = true;
        }
        input.boost = true;
        return input;
    }

    // Otherwise line up under the lowest target and shoot
    let target = state
        .registry
        .enemies
        .iter()
        .map(|(_, e)| e.body.rect)
        .chain(state.registry.minions.iter().map(|(_, m)| m.body.rect))
        .chain(state.registry.bosses.iter().map(|(_, b)| b.body.rect))
        .max_by(|a, b| a.bottom().total_cmp(&b.bottom()));

    if let Some(target) = target {
        let dx = target.center.x - me.center.x;
        if dx.abs() > tuning.player_speed {
            input.left = dx < 0.0;
            input.right = dx > 0.0;
        }
        if dx.abs() < target.half.x && player.charge >= SHOT_CHARGE {
            input.fire = true;
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::score::Score;
    use crate::sim::state::{Body, Enemy, EnemyMotion, ThreatKind, ThreatProjectile};
    use glam::Vec2;

    fn setup() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        (GameState::new(&tuning), tuning)
    }

    #[test]
    fn test_always_charges() {
        let (state, tuning) = setup();
        let input = autopilot(&state, &tuning);
        assert!(input.charge);
        assert!(!input.fire);
    }

    #[test]
    fn test_dodges_incoming() {
        let (mut state, tuning) = setup();
        state.registry.add_threat(ThreatProjectile::new(
            ThreatKind::Bomb,
            Vec2::new(810.0, 700.0),
            Vec2::Y,
            8.0,
            20.0,
            0,
        ));
        state.registry.commit();
        let input = autopilot(&state, &tuning);
        assert!(input.left && input.boost);
        assert!(!input.empower);
    }

    #[test]
    fn test_empowers_when_affordable() {
        let (mut state, tuning) = setup();
        state.score = Score::new(120);
        state.registry.add_threat(ThreatProjectile::new(
            ThreatKind::Bomb,
            Vec2::new(790.0, 700.0),
            Vec2::Y,
            8.0,
            20.0,
            0,
        ));
        state.registry.commit();
        let input = autopilot(&state, &tuning);
        assert!(input.empower && input.right);
    }

    #[test]
    fn test_lines_up_and_fires() {
        let (mut state, tuning) = setup();
        state.registry.player.charge = SHOT_CHARGE;
        state.registry.add_enemy(Enemy {
            body: Body::fixed(Vec2::new(805.0, 200.0), Vec2::splat(32.0)),
            stop_y: 200.0,
            motion: EnemyMotion::Holding,
            drop_interval: 50,
        });
        state.registry.commit();
        let input = autopilot(&state, &tuning);
        assert!(input.fire);
        assert!(!input.left && !input.right);
    }
}
