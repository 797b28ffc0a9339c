//! Phase state machine
//!
//! Wave -> BossEncounter -> (GameOver | Wave), and any phase -> GameOver on a
//! lethal hit. GameOver is terminal.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::CollisionReport;
use super::spawn::spawn_boss_encounter;
use super::state::{GamePhase, GameState, RunOutcome};
use crate::tuning::{BossDefeatPolicy, Tuning};

/// A transition taken this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseChange {
    BossEncounterStarted,
    /// Boss down, back to the wave
    WaveResumed,
    RunEnded(RunOutcome),
}

fn end_run(state: &mut GameState, outcome: RunOutcome) -> PhaseChange {
    state.phase = GamePhase::GameOver;
    state.outcome = Some(outcome);
    log::info!(
        "tick {}: game over ({outcome:?}), final score {}",
        state.time_ticks,
        state.score.value()
    );
    PhaseChange::RunEnded(outcome)
}

/// Evaluate transitions after collisions. Boss spawns are queued, not committed.
pub fn update(
    state: &mut GameState,
    collisions: &CollisionReport,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> Option<PhaseChange> {
    if state.is_over() {
        return None;
    }
    if collisions.lethal {
        return Some(end_run(state, RunOutcome::Defeated));
    }

    let phase = state.phase;
    match phase {
        GamePhase::Wave
            if !state.boss_encounter_started
                && state.score.value() > tuning.boss_score_threshold =>
        {
            spawn_boss_encounter(&mut state.registry, tuning, rng);
            state.boss_encounter_started = true;
            state.phase = GamePhase::BossEncounter;
            log::info!(
                "tick {}: score {} passed {}, boss encounter",
                state.time_ticks,
                state.score.value(),
                tuning.boss_score_threshold
            );
            Some(PhaseChange::BossEncounterStarted)
        }
        GamePhase::BossEncounter if state.boss_hp().is_some_and(|hp| hp <= 0) => {
            state.registry.bosses.mark_all_dead();
            state.registry.minions.mark_all_dead();
            match tuning.boss_defeat {
                BossDefeatPolicy::Victory => Some(end_run(state, RunOutcome::Victory)),
                BossDefeatPolicy::ResumeWave => {
                    state.phase = GamePhase::Wave;
                    log::info!("tick {}: boss defeated, wave resumes", state.time_ticks);
                    Some(PhaseChange::WaveResumed)
                }
            }
        }
        _ => None,
    }
}
