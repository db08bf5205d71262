// ═══════════════════════════════════════════════════════════════════════
// Turn driver — runs computer players until a human is up or the game ends
// ═══════════════════════════════════════════════════════════════════════

use frisk_engine::dice::DiceQueue;
use frisk_engine::engine::{apply_action, force_next_turn};
use frisk_engine::error::EngineError;
use frisk_engine::types::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::agent::Agent;

pub const DEFAULT_STEP_LIMIT: usize = 5_000;
pub const DEFAULT_MAX_TURNS: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveLimits {
    /// Decisions per AI turn before the turn is ended by force.
    pub step_limit: usize,
    /// Consecutive AI turns per drive.
    pub max_turns: usize,
    /// Top the dice queue up from its standard seed between actions.
    pub replenish: bool,
}

impl Default for DriveLimits {
    fn default() -> Self {
        DriveLimits { step_limit: DEFAULT_STEP_LIMIT, max_turns: DEFAULT_MAX_TURNS, replenish: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    HumanTurn,
    GameOver,
    TurnLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveReport {
    pub turns: usize,
    pub steps: usize,
    /// Turns cut short by the step limit.
    pub forced: usize,
    pub stop: StopReason,
}

/// Play the current player's turn with `agent`. Returns the number of
/// decisions taken and whether the step limit forced the turn to end.
pub fn play_turn(
    state: &mut GameState,
    dice: &mut DiceQueue,
    agent: &mut dyn Agent,
    limits: &DriveLimits,
) -> Result<(usize, bool), EngineError> {
    let player = state.current_player();
    let turn = state.turn.turn_number;
    let mut steps = 0;

    while state.winner.is_none() && state.turn.turn_number == turn {
        if steps >= limits.step_limit {
            warn!(%player, steps, "AI step limit reached, ending turn");
            force_next_turn(state)?;
            return Ok((steps, true));
        }
        if limits.replenish {
            dice.replenish_if_low();
        }
        let Some(action) = agent.decide(state) else { break };
        apply_action(state, dice, action)?;
        steps += 1;
    }
    Ok((steps, false))
}

/// Run AI turns while the current player is a computer player.
/// `agents` is indexed by player id.
pub fn run_ai_turns(
    state: &mut GameState,
    dice: &mut DiceQueue,
    agents: &mut [Box<dyn Agent>],
    limits: &DriveLimits,
) -> Result<DriveReport, EngineError> {
    let mut report = DriveReport { turns: 0, steps: 0, forced: 0, stop: StopReason::GameOver };

    loop {
        if state.winner.is_some() {
            report.stop = StopReason::GameOver;
            break;
        }
        let player = state.current_player();
        if state.player(player).is_human {
            report.stop = StopReason::HumanTurn;
            break;
        }
        if report.turns >= limits.max_turns {
            warn!(turns = report.turns, "AI turn limit reached");
            report.stop = StopReason::TurnLimit;
            break;
        }
        let agent = agents.get_mut(player.index())
            .ok_or_else(|| EngineError::InvalidReference(format!("no agent for player {player}")))?;
        let (steps, forced) = play_turn(state, dice, agent.as_mut(), limits)?;
        debug!(%player, agent = agent.name(), steps, "AI turn played");
        report.turns += 1;
        report.steps += steps;
        report.forced += forced as usize;
    }
    Ok(report)
}
