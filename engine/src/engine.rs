// ═══════════════════════════════════════════════════════════════════════
// Game Engine — turn/phase state machine and action resolution
//
// Architecture:
//   The engine is a pure state machine. It never does I/O or calls agents.
//   `pending()` describes the decision the current player owes, the
//   driver (server session, runner, tests) asks the right agent or caller,
//   and feeds the answer back via `apply_action()`.
//
// Flow:
//   REINFORCE ──pool empty──▶ ATTACK ──end_attack / fortify──▶ FORTIFY
//       ▲                                                        │
//       └──────────────── end_turn (next alive player) ◀─────────┘
//   GAME_OVER once a single player is alive.
//
// Every action is all-or-nothing: validation and dice drawing happen
// before the state is touched, so a rejected action changes nothing.
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::combat::{self, RoundOutcome};
use crate::dice::DiceQueue;
use crate::error::EngineError;
use crate::log::MoveRecord;
use crate::map;
use crate::navigation;
use crate::reinforcement::reinforcement_pool;
use crate::types::*;

/// Moves a player (or the control API on their behalf) can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Place `count` armies from the pool on an owned territory.
    Reinforce { tid: TerritoryId, count: u32 },

    /// Commit `armies` from `from` against the adjacent `to`.
    Attack { from: TerritoryId, to: TerritoryId, armies: u32 },

    /// Move into a freshly captured territory.
    PostAttackMove { from: TerritoryId, to: TerritoryId, count: u32 },

    /// Stop attacking, go to the fortify phase.
    EndAttack,

    /// The single fortification move of the turn.
    Fortify { from: TerritoryId, to: TerritoryId, count: u32 },

    /// Pass control to the next alive player.
    EndTurn,
}

impl Action {
    pub fn to_record(self) -> MoveRecord {
        match self {
            Action::Reinforce { tid, count } => MoveRecord::Reinforce { tid, count },
            Action::Attack { from, to, armies } => MoveRecord::Attack { from, to, armies },
            Action::PostAttackMove { from, to, count } => MoveRecord::PostAttackMove { from, to, count },
            Action::EndAttack => MoveRecord::EndAttack,
            Action::Fortify { from, to, count } => MoveRecord::Fortify { from, to, count },
            Action::EndTurn => MoveRecord::EndTurn,
        }
    }
}

/// Everything that happened during one `Attack` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    pub from: TerritoryId,
    pub to: TerritoryId,
    pub committed: u32,
    pub rounds: Vec<RoundOutcome>,
    pub attacker_losses: u32,
    pub defender_losses: u32,
    pub captured: bool,
    /// Committed armies still standing (the most that can follow in).
    pub survivors: u32,
    /// Player whose last territory fell.
    pub eliminated: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    Applied,
    Attack(AttackReport),
    /// Turn passed to `next`, who starts with `reinforcements`.
    TurnPassed { next: PlayerId, reinforcements: u32 },
}

// ── Pending decision ───────────────────────────────────────────────────

/// The decision the current player owes, or None once the game is over.
pub fn pending(state: &GameState) -> Option<PendingDecision> {
    let player = state.current_player();
    if let Some(capture) = state.pending_capture {
        let max = state.armies(capture.from).saturating_sub(1);
        return Some(PendingDecision::MoveAfterCapture { player, capture, max });
    }
    match state.turn.phase {
        Phase::GameOver => None,
        Phase::Reinforce => Some(PendingDecision::PlaceReinforcements {
            player,
            remaining: state.player(player).reinforcements,
        }),
        Phase::Attack => Some(PendingDecision::AttackOrEnd { player }),
        Phase::Fortify => Some(PendingDecision::FortifyOrEnd { player, fortified: state.fortified }),
    }
}

// ── Apply ──────────────────────────────────────────────────────────────

/// Validate and apply `action` for the current player.
pub fn apply_action(state: &mut GameState, dice: &mut DiceQueue, action: Action) -> Result<ActionOutcome, EngineError> {
    if let Some(winner) = state.winner {
        return Err(EngineError::GameOver(winner));
    }
    let player = state.current_player();

    if let Some(capture) = state.pending_capture {
        if !matches!(action, Action::PostAttackMove { .. }) {
            return Err(EngineError::illegal(format!(
                "capture of {} must be settled with post_attack_move first", capture.to
            )));
        }
    }

    let outcome = match action {
        Action::Reinforce { tid, count } => {
            reinforce(state, player, tid, count)?;
            ActionOutcome::Applied
        }
        Action::Attack { from, to, armies } => ActionOutcome::Attack(attack(state, dice, player, from, to, armies)?),
        Action::PostAttackMove { from, to, count } => {
            post_attack_move(state, from, to, count)?;
            ActionOutcome::Applied
        }
        Action::EndAttack => {
            expect_phase(state, Phase::Attack, "end_attack")?;
            state.turn.phase = Phase::Fortify;
            ActionOutcome::Applied
        }
        Action::Fortify { from, to, count } => {
            fortify(state, player, from, to, count)?;
            ActionOutcome::Applied
        }
        Action::EndTurn => {
            if state.turn.phase == Phase::Reinforce {
                return Err(EngineError::illegal(format!(
                    "{} reinforcements left to place", state.player(player).reinforcements
                )));
            }
            state.log.record(player, action.to_record());
            return Ok(advance_turn(state));
        }
    };

    state.log.record(player, action.to_record());
    settle_if_over(state);
    Ok(outcome)
}

/// End the current turn whatever the phase: unplaced reinforcements are
/// forfeited and a pending capture is settled by moving the survivors in.
pub fn force_next_turn(state: &mut GameState) -> Result<ActionOutcome, EngineError> {
    if let Some(winner) = state.winner {
        return Err(EngineError::GameOver(winner));
    }
    let player = state.current_player();
    if let Some(capture) = state.pending_capture.take() {
        let count = capture.survivors.min(state.armies(capture.from) - 1).max(1);
        move_armies(state, capture.from, capture.to, count);
        state.log.record(player, MoveRecord::PostAttackMove { from: capture.from, to: capture.to, count });
    }
    state.log.record(player, MoveRecord::NextTurn);
    Ok(advance_turn(state))
}

// ── Operations ─────────────────────────────────────────────────────────

fn expect_phase(state: &GameState, phase: Phase, op: &str) -> Result<(), EngineError> {
    if state.turn.phase != phase {
        return Err(EngineError::illegal(format!(
            "{op} is not allowed in the {} phase", state.turn.phase
        )));
    }
    Ok(())
}

fn expect_owned(state: &GameState, tid: TerritoryId, player: PlayerId) -> Result<(), EngineError> {
    check_id(tid)?;
    if !state.is_owned_by(tid, player) {
        return Err(EngineError::not_owned(tid, player));
    }
    Ok(())
}

fn check_id(tid: TerritoryId) -> Result<(), EngineError> {
    if tid.index() >= map::NUM_TERRITORIES {
        return Err(EngineError::unknown_territory(tid.0 as i64));
    }
    Ok(())
}

fn reinforce(state: &mut GameState, player: PlayerId, tid: TerritoryId, count: u32) -> Result<(), EngineError> {
    expect_phase(state, Phase::Reinforce, "reinforce")?;
    expect_owned(state, tid, player)?;
    let pool = state.player(player).reinforcements;
    if count == 0 || count > pool {
        return Err(EngineError::illegal(format!("reinforce count {count} not in 1..={pool}")));
    }

    let armies = state.armies(tid).checked_add(count)
        .ok_or_else(|| EngineError::illegal(format!("reinforcing {tid} by {count} overflows its army count")))?;
    state.territory_mut(tid).armies = armies;
    let left = pool - count;
    state.player_mut(player).reinforcements = left;
    if left == 0 {
        state.turn.phase = Phase::Attack;
    }
    Ok(())
}

fn attack(
    state: &mut GameState,
    dice: &mut DiceQueue,
    player: PlayerId,
    from: TerritoryId,
    to: TerritoryId,
    armies: u32,
) -> Result<AttackReport, EngineError> {
    expect_phase(state, Phase::Attack, "attack")?;
    expect_owned(state, from, player)?;
    check_id(to)?;
    if !map::is_adjacent(from, to) {
        return Err(EngineError::illegal(format!("{to} is not adjacent to {from}")));
    }
    let defender = match state.owner(to) {
        Some(owner) if owner != player => owner,
        _ => return Err(EngineError::illegal(format!("{to} is not an enemy territory"))),
    };
    let available = state.armies(from);
    if armies == 0 || armies >= available {
        return Err(EngineError::illegal(format!(
            "cannot commit {armies} armies from {from} holding {available}"
        )));
    }

    // Resolve every round against a scratch copy of the queue so running
    // out of dice midway leaves the real queue untouched.
    let mut scratch = dice.clone();
    let mut committed = armies;
    let mut defending = state.armies(to);
    let mut rounds = Vec::new();
    while committed > 0 && defending > 0 {
        let round = combat::resolve_round(committed, defending, &mut scratch)?;
        committed -= round.attacker_losses;
        defending -= round.defender_losses;
        rounds.push(round);
    }
    *dice = scratch;

    let attacker_losses = armies - committed;
    let defender_losses = state.armies(to) - defending;
    state.territory_mut(from).armies -= attacker_losses;
    let captured = defending == 0;

    let mut eliminated = None;
    if captured {
        *state.territory_mut(to) = TerritoryState { owner: Some(player), armies: 0 };
        state.pending_capture = Some(PendingCapture { from, to, survivors: committed });
        debug!(%player, %from, %to, survivors = committed, "territory captured");

        if state.territory_count(defender) == 0 {
            state.player_mut(defender).is_alive = false;
            eliminated = Some(defender);
            info!(%player, eliminated = %defender, "player eliminated");
            check_game_over(state);
        }
    } else {
        state.territory_mut(to).armies = defending;
    }

    Ok(AttackReport {
        from,
        to,
        committed: armies,
        rounds,
        attacker_losses,
        defender_losses,
        captured,
        survivors: committed,
        eliminated,
    })
}

fn post_attack_move(state: &mut GameState, from: TerritoryId, to: TerritoryId, count: u32) -> Result<(), EngineError> {
    let capture = match state.pending_capture {
        Some(c) if c.from == from && c.to == to => c,
        Some(c) => {
            return Err(EngineError::illegal(format!(
                "pending capture is {} -> {}, not {from} -> {to}", c.from, c.to
            )))
        }
        None => return Err(EngineError::illegal("no capture to move into")),
    };
    let max = state.armies(capture.from) - 1;
    if count == 0 || count > max {
        return Err(EngineError::illegal(format!("post-attack move {count} not in 1..={max}")));
    }
    move_armies(state, from, to, count);
    state.pending_capture = None;
    Ok(())
}

fn fortify(state: &mut GameState, player: PlayerId, from: TerritoryId, to: TerritoryId, count: u32) -> Result<(), EngineError> {
    if !matches!(state.turn.phase, Phase::Attack | Phase::Fortify) {
        return Err(EngineError::illegal(format!("fortify is not allowed in the {} phase", state.turn.phase)));
    }
    if state.fortified {
        return Err(EngineError::illegal("already fortified this turn"));
    }
    expect_owned(state, from, player)?;
    expect_owned(state, to, player)?;
    if from == to {
        return Err(EngineError::illegal("fortify needs two different territories"));
    }
    if !navigation::is_connected(state, from, to, player) {
        return Err(EngineError::illegal(format!("{from} and {to} are not connected")));
    }
    let available = state.armies(from);
    if count == 0 || count >= available {
        return Err(EngineError::illegal(format!("cannot move {count} armies from {from} holding {available}")));
    }

    move_armies(state, from, to, count);
    state.fortified = true;
    state.turn.phase = Phase::Fortify;
    Ok(())
}

// ── Turn bookkeeping ───────────────────────────────────────────────────

fn move_armies(state: &mut GameState, from: TerritoryId, to: TerritoryId, count: u32) {
    state.territory_mut(from).armies -= count;
    state.territory_mut(to).armies += count;
}

/// Pass control to the next alive player and hand them their pool.
fn advance_turn(state: &mut GameState) -> ActionOutcome {
    let current = state.current_player();
    state.player_mut(current).reinforcements = 0;
    state.pending_capture = None;
    state.fortified = false;

    let n = state.players.len();
    let mut idx = state.turn.player_index;
    for _ in 0..n {
        idx = (idx + 1) % n;
        if state.players[idx].is_alive {
            break;
        }
    }
    state.turn.player_index = idx;
    state.turn.turn_number += 1;
    state.turn.phase = Phase::Reinforce;

    let next = state.current_player();
    let pool = reinforcement_pool(state, next);
    state.player_mut(next).reinforcements = pool;
    debug!(player = %next, reinforcements = pool, turn = state.turn.turn_number, "turn started");
    ActionOutcome::TurnPassed { next, reinforcements: pool }
}

fn check_game_over(state: &mut GameState) {
    let alive = state.alive_players();
    if alive.len() == 1 {
        state.turn.phase = Phase::GameOver;
        state.winner = Some(alive[0]);
        info!(winner = %alive[0], turn = state.turn.turn_number, "game over");
    }
}

/// The final capture of a game needs no decision: the survivors follow in.
fn settle_if_over(state: &mut GameState) {
    if state.winner.is_none() {
        return;
    }
    if let Some(capture) = state.pending_capture.take() {
        let count = capture.survivors.min(state.armies(capture.from) - 1);
        move_armies(state, capture.from, capture.to, count);
        let (from, to) = (capture.from, capture.to);
        state.log.record(state.current_player(), MoveRecord::PostAttackMove { from, to, count });
    }
}

// ── Invariants ─────────────────────────────────────────────────────────

/// Structural invariants that hold between any two actions. Returns the
/// first violation found.
pub fn check_invariants(state: &GameState) -> Result<(), String> {
    for (i, t) in state.territories.iter().enumerate() {
        let tid = TerritoryId(i as u8);
        let Some(owner) = t.owner else { continue };
        if !state.player(owner).is_alive {
            return Err(format!("territory {tid} owned by dead player {owner}"));
        }
        let capturing = state.pending_capture.is_some_and(|c| c.to == tid);
        if t.armies == 0 && !capturing {
            return Err(format!("territory {tid} holds no armies"));
        }
    }
    for p in &state.players {
        let owns = state.territory_count(p.id) > 0;
        if owns != p.is_alive {
            return Err(format!("player {} alive={} but owns territory={}", p.id, p.is_alive, owns));
        }
    }
    if state.is_over() != state.winner.is_some() {
        return Err("winner and game-over phase disagree".into());
    }
    Ok(())
}
