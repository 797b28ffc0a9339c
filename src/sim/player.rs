//! Player controller: empower, movement, charge and fire
//!
//! Within one tick the order is fixed: empower activation, movement, charge,
//! fire, then the empower countdown. A fire that would fail is rejected before
//! any of them apply.

use glam::Vec2;

use super::error::SimError;
use super::geometry::Bounds;
use super::kinematics::move_player;
use super::registry::{EntityId, Registry};
use super::score::Score;
use super::state::{GameState, Player, PowerState, WeaponProjectile, WeaponTier};
use super::tick::TickInput;
use crate::tuning::Tuning;

/// What the player did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerReport {
    pub empowered: bool,
    pub moved: bool,
    pub fired: Option<(EntityId, WeaponTier)>,
    /// Empowerment ran out this tick
    pub power_expired: bool,
}

/// Summed direction of the held movement inputs
pub fn intent(input: &TickInput, vertical_movement: bool) -> Vec2 {
    let axis = |neg: bool, pos: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
    let x = axis(input.left, input.right);
    let y = if vertical_movement {
        axis(input.up, input.down)
    } else {
        0.0
    };
    Vec2::new(x, y)
}

/// Spend score to become empowered. Ignored while already empowered.
pub fn try_empower(player: &mut Player, score: &mut Score, tuning: &Tuning) -> bool {
    if player.is_empowered() || !score.try_spend(tuning.empower_cost) {
        return false;
    }
    player.power = PowerState::Empowered;
    player.empower_ticks = tuning.empower_ticks;
    true
}

/// Release the banked charge as a shot one player-height above the craft
pub fn fire(reg: &mut Registry, tuning: &Tuning) -> Result<(EntityId, WeaponTier), SimError> {
    let player = &mut reg.player;
    if player.charge < 0 {
        return Err(SimError::InvalidChargeFire {
            charge: player.charge,
        });
    }
    let tier = WeaponTier::for_charge(
        player.charge,
        tuning.charged_threshold,
        tuning.super_threshold,
    );
    player.charge = 0;
    let center = player.body.center() - Vec2::new(0.0, player.body.rect.size().y);
    let id = reg.add_weapon(WeaponProjectile::new(center, tuning.beam_speed, tier));
    Ok((id, tier))
}

/// Count down an active empowerment. Returns true when it lapses.
pub fn tick_power(player: &mut Player) -> bool {
    if !player.is_empowered() {
        return false;
    }
    player.empower_ticks -= 1;
    if player.empower_ticks < 0 {
        player.power = PowerState::Normal;
        return true;
    }
    false
}

/// Apply one tick of input to the player. New shots are queued, not committed.
pub fn update(
    state: &mut GameState,
    input: &TickInput,
    tuning: &Tuning,
    dt: f32,
) -> Result<PlayerReport, SimError> {
    let tick = state.time_ticks;
    let bounds: Bounds = state.bounds;
    let mut report = PlayerReport::default();

    let charge = state
        .registry
        .player
        .charge
        .saturating_add(i32::from(input.charge));
    if input.fire && charge < 0 {
        return Err(SimError::InvalidChargeFire { charge });
    }

    if input.empower {
        report.empowered = try_empower(&mut state.registry.player, &mut state.score, tuning);
        if report.empowered {
            log::info!(
                "tick {tick}: empowered for {} ticks, score now {}",
                tuning.empower_ticks,
                state.score.value()
            );
        }
    }

    let speed = if input.boost {
        tuning.player_boost_speed
    } else {
        tuning.player_speed
    };
    let direction = intent(input, tuning.vertical_movement);
    report.moved = move_player(&mut state.registry.player, &bounds, direction, speed, dt);

    if input.charge {
        let player = &mut state.registry.player;
        player.charge = player.charge.saturating_add(1);
    }

    if input.fire {
        let (id, tier) = fire(&mut state.registry, tuning)?;
        log::debug!("tick {tick}: fired {tier:?} shot {id:?}");
        report.fired = Some((id, tier));
    }

    report.power_expired = tick_power(&mut state.registry.player);
    if report.power_expired {
        log::info!("tick {tick}: empowerment expired");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn setup() -> (GameState, Tuning) {
        let tuning = Tuning::default();
        (GameState::new(&tuning), tuning)
    }

    #[test]
    fn test_intent_sums_inputs() {
        let input = TickInput {
            left: true,
            right: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(intent(&input, true), Vec2::new(0.0, 1.0));
        assert_eq!(intent(&input, false), Vec2::ZERO);
    }

    #[test]
    fn test_boost_doubles_speed() {
        let (mut state, tuning) = setup();
        let input = TickInput {
            left: true,
            boost: true,
            ..Default::default()
        };
        update(&mut state, &input, &tuning, 1.0).unwrap();
        assert_eq!(state.player().body.center(), Vec2::new(780.0, 825.0));
    }

    #[test]
    fn test_horizontal_only_ignores_up() {
        let (mut state, mut tuning) = setup();
        tuning.vertical_movement = false;
        let input = TickInput {
            up: true,
            ..Default::default()
        };
        let report = update(&mut state, &input, &tuning, 1.0).unwrap();
        assert!(!report.moved);
        assert_eq!(state.player().body.center(), Vec2::new(800.0, 825.0));
    }

    #[test]
    fn test_empower_needs_score() {
        let (mut state, tuning) = setup();
        state.score = Score::new(99);
        let input = TickInput {
            empower: true,
            ..Default::default()
        };
        let report = update(&mut state, &input, &tuning, 1.0).unwrap();
        assert!(!report.empowered);
        assert_eq!(state.score.value(), 99);
        assert_eq!(state.player().power, PowerState::Normal);

        state.score = Score::new(150);
        let report = update(&mut state, &input, &tuning, 1.0).unwrap();
        assert!(report.empowered);
        assert_eq!(state.score.value(), 50);
        // Counted down once in the same tick
        assert_eq!(state.player().empower_ticks, 499);
    }

    #[test]
    fn test_empower_while_empowered_ignored() {
        let (mut state, tuning) = setup();
        state.score = Score::new(300);
        let input = TickInput {
            empower: true,
            ..Default::default()
        };
        update(&mut state, &input, &tuning, 1.0).unwrap();
        update(&mut state, &input, &tuning, 1.0).unwrap();
        assert_eq!(state.score.value(), 200);
        assert_eq!(state.player().empower_ticks, 498);
    }

    #[test]
    fn test_empowerment_lapses() {
        let (mut state, mut tuning) = setup();
        tuning.empower_ticks = 3;
        state.score = Score::new(100);
        let empower = TickInput {
            empower: true,
            ..Default::default()
        };
        update(&mut state, &empower, &tuning, 1.0).unwrap();
        let idle = TickInput::default();
        // 3 → 2 on activation, then 1, 0, -1
        let mut lapsed_at = None;
        for i in 0..5 {
            let report = update(&mut state, &idle, &tuning, 1.0).unwrap();
            if report.power_expired {
                lapsed_at = Some(i);
            }
        }
        assert_eq!(lapsed_at, Some(2));
        assert_eq!(state.player().power, PowerState::Normal);
    }

    #[test]
    fn test_fire_spawns_above_player() {
        let (mut state, tuning) = setup();
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        let report = update(&mut state, &input, &tuning, 1.0).unwrap();
        let (id, tier) = report.fired.unwrap();
        assert_eq!(tier, WeaponTier::Basic);
        state.registry.commit();
        let beam = state.registry.weapons.get(id).unwrap();
        assert_eq!(beam.body.center(), Vec2::new(800.0, 761.0));
        assert_eq!(beam.body.vel, Vec2::NEG_Y);
    }

    #[test]
    fn test_charge_then_fire_same_tick() {
        let (mut state, tuning) = setup();
        state.registry.player.charge = 9;
        let input = TickInput {
            charge: true,
            fire: true,
            ..Default::default()
        };
        let report = update(&mut state, &input, &tuning, 1.0).unwrap();
        assert_eq!(report.fired.map(|(_, t)| t), Some(WeaponTier::Charged));
        assert_eq!(state.player().charge, 0);
    }

    #[test]
    fn test_negative_charge_is_an_error() {
        let (mut state, tuning) = setup();
        state.registry.player.charge = -1;
        let err = fire(&mut state.registry, &tuning).unwrap_err();
        assert_eq!(err, SimError::InvalidChargeFire { charge: -1 });
    }

    #[test]
    fn test_rejected_fire_leaves_player_untouched() {
        let (mut state, tuning) = setup();
        state.score = Score::new(150);
        state.registry.player.charge = -3;
        let input = TickInput {
            empower: true,
            left: true,
            charge: true,
            fire: true,
            ..Default::default()
        };
        let err = update(&mut state, &input, &tuning, 1.0).unwrap_err();
        assert_eq!(err, SimError::InvalidChargeFire { charge: -2 });
        assert_eq!(state.score.value(), 150);
        assert_eq!(state.player().power, PowerState::Normal);
        assert_eq!(state.player().body.center(), Vec2::new(800.0, 825.0));
        assert_eq!(state.player().charge, -3);
        assert_eq!(state.registry.weapons.pending_len(), 0);
    }

    #[test]
    fn test_charge_press_can_lift_charge_to_zero() {
        let (mut state, tuning) = setup();
        state.registry.player.charge = -1;
        let input = TickInput {
            charge: true,
            fire: true,
            ..Default::default()
        };
        let report = update(&mut state, &input, &tuning, 1.0).unwrap();
        assert_eq!(report.fired.map(|(_, t)| t), Some(WeaponTier::Basic));
    }

    proptest! {
        #[test]
        fn prop_charge_tiering(charge in 0i32..1000) {
            let (mut state, tuning) = setup();
            state.registry.player.charge = charge;
            let (_, tier) = fire(&mut state.registry, &tuning).unwrap();
            let expected = if charge < 10 {
                WeaponTier::Basic
            } else if charge < 20 {
                WeaponTier::Charged
            } else {
                WeaponTier::Super
            };
            prop_assert_eq!(tier, expected);
            prop_assert_eq!(state.player().charge, 0);
        }
    }
}
