// ═══════════════════════════════════════════════════════════════════════
// Sessions — one game, its dice and its computer players per session.
// The store owns the default game plus any named games.
// ═══════════════════════════════════════════════════════════════════════

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use frisk_agents::{run_ai_turns, Agent, DriveLimits, PathfinderAgent};
use frisk_engine::dice::DiceQueue;
use frisk_engine::engine::{apply_action, force_next_turn, Action, ActionOutcome};
use frisk_engine::error::{DiceError, EngineError};
use frisk_engine::setup::load_scenario;
use frisk_engine::types::*;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::protocol::Request;
use crate::views;

/// Successful result of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Empty,
    Json(Value),
    Text(String),
}

pub struct Session {
    state: Option<GameState>,
    dice: DiceQueue,
    agents: Vec<Box<dyn Agent>>,
    limits: DriveLimits,
}

fn territory_arg(raw: i64) -> Result<TerritoryId, EngineError> {
    TerritoryId::new(raw).ok_or_else(|| EngineError::unknown_territory(raw))
}

fn count_arg(raw: i64) -> Result<u32, EngineError> {
    u32::try_from(raw).map_err(|_| EngineError::IllegalMove(format!("army count {raw} is out of range")))
}

impl Session {
    /// A session with no game loaded and an empty dice queue.
    pub fn new(standard_dice: &[i64], limits: DriveLimits) -> Result<Session, DiceError> {
        let mut dice = DiceQueue::new();
        dice.set_standard(standard_dice)?;
        Ok(Session { state: None, dice, agents: Vec::new(), limits })
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn dice(&self) -> &DiceQueue {
        &self.dice
    }

    fn game(&mut self) -> Result<&mut GameState, EngineError> {
        self.state.as_mut().ok_or_else(|| EngineError::IllegalMove("no game loaded".into()))
    }

    fn game_ref(&self) -> Result<&GameState, EngineError> {
        self.state.as_ref().ok_or_else(|| EngineError::IllegalMove("no game loaded".into()))
    }

    fn apply(&mut self, action: Action) -> Result<Reply, EngineError> {
        let state = self.state.as_mut().ok_or_else(|| EngineError::IllegalMove("no game loaded".into()))?;
        let outcome = apply_action(state, &mut self.dice, action)?;
        match outcome {
            ActionOutcome::Attack(report) => Ok(Reply::Json(json!(report))),
            ActionOutcome::TurnPassed { .. } => self.hand_over(),
            ActionOutcome::Applied => Ok(Reply::Empty),
        }
    }

    /// Let computer players move until a human is up or the game ends.
    fn hand_over(&mut self) -> Result<Reply, EngineError> {
        let state = self.state.as_mut().ok_or_else(|| EngineError::IllegalMove("no game loaded".into()))?;
        let report = run_ai_turns(state, &mut self.dice, &mut self.agents, &self.limits)?;
        debug!(turns = report.turns, steps = report.steps, stop = ?report.stop, "computer players done");
        Ok(Reply::Json(json!(report)))
    }

    pub fn handle(&mut self, request: Request) -> Result<Reply, EngineError> {
        match request {
            Request::LoadGame(scenario) => {
                let state = load_scenario(&scenario)?;
                info!(players = state.players.len(), player = %state.current_player(), phase = %state.turn.phase, "game loaded");
                self.agents = state.players.iter()
                    .map(|_| Box::new(PathfinderAgent::new()) as Box<dyn Agent>)
                    .collect();
                self.state = Some(state);
                Ok(Reply::Empty)
            }

            // ── Dice ──
            Request::ResetDiceRollArray => {
                self.dice.clear();
                Ok(Reply::Empty)
            }
            Request::PushDiceRolls(values) => {
                self.dice.push(&values)?;
                Ok(Reply::Empty)
            }
            Request::GetDiceLeft => Ok(Reply::Text(self.dice.remaining().to_string())),
            Request::ResetToStandardDice => {
                self.dice.reset_to_standard();
                Ok(Reply::Empty)
            }

            // ── Moves ──
            Request::Reinforce { tid, count } => {
                self.apply(Action::Reinforce { tid: territory_arg(tid)?, count: count_arg(count)? })
            }
            Request::Attack { from, to, armies } => self.apply(Action::Attack {
                from: territory_arg(from)?,
                to: territory_arg(to)?,
                armies: count_arg(armies)?,
            }),
            Request::PostAttackMove { from, to, count } => self.apply(Action::PostAttackMove {
                from: territory_arg(from)?,
                to: territory_arg(to)?,
                count: count_arg(count)?,
            }),
            Request::EndAttack => self.apply(Action::EndAttack),
            Request::Fortify { from, to, count } => self.apply(Action::Fortify {
                from: territory_arg(from)?,
                to: territory_arg(to)?,
                count: count_arg(count)?,
            }),
            Request::EndTurn => self.apply(Action::EndTurn),
            Request::SetNextTurn => {
                force_next_turn(self.game()?)?;
                self.hand_over()
            }

            // ── Queries ──
            Request::GetTerritories => Ok(Reply::Json(json!(views::territories(self.game_ref()?)))),
            Request::GetPlayers => Ok(Reply::Json(json!(views::players(self.game_ref()?)))),
            Request::GetTurnInfo => Ok(Reply::Json(json!(self.game_ref()?.turn))),
            Request::GetNumberOfAlivePlayers => Ok(Reply::Json(json!(self.game_ref()?.alive_count()))),

            // ── Move log ──
            Request::TurnOnLogApiCalls => {
                self.game()?.log.turn_on();
                Ok(Reply::Empty)
            }
            Request::TurnOffLogApiCalls => {
                self.game()?.log.turn_off();
                Ok(Reply::Empty)
            }
            Request::ResetLogApiCalls => {
                self.game()?.log.reset();
                Ok(Reply::Empty)
            }
            Request::GetLogApiCalls => Ok(Reply::Json(json!(self.game_ref()?.log.call_lines()))),
        }
    }
}

// ── Store ──────────────────────────────────────────────────────────────

/// Every game the server knows about.
pub struct GameStore {
    standard_dice: Vec<i64>,
    limits: DriveLimits,
    default_game: Session,
    games: HashMap<String, Session>,
}

impl GameStore {
    pub fn new(config: &ServerConfig) -> Result<GameStore, DiceError> {
        let standard_dice = config.standard_dice()?;
        let limits = config.limits();
        let default_game = Session::new(&standard_dice, limits)?;
        Ok(GameStore { standard_dice, limits, default_game, games: HashMap::new() })
    }

    pub fn default_game(&self) -> &Session {
        &self.default_game
    }

    pub fn game_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.games.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// The named game, created on first use; the default game for None.
    pub fn session(&mut self, game_id: Option<&str>) -> Result<&mut Session, DiceError> {
        let Some(id) = game_id else { return Ok(&mut self.default_game) };
        match self.games.entry(id.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                info!(game = id, "new game session");
                Ok(e.insert(Session::new(&self.standard_dice, self.limits)?))
            }
        }
    }

    /// Parse and run one call expression.
    pub fn call(&mut self, game_id: Option<&str>, text: &str) -> Result<Reply, ApiError> {
        let request = Request::parse(text).map_err(|e| ApiError::new(e, text))?;
        let query = request.is_query();
        let session = self.session(game_id).map_err(|e| ApiError::new(EngineError::from(e), text))?;
        let reply = session.handle(request).map_err(|e| ApiError::new(e, text))?;
        if query {
            debug!(game = game_id.unwrap_or("default"), call = text.trim(), "query");
        } else {
            info!(game = game_id.unwrap_or("default"), call = text.trim(), "call applied");
        }
        Ok(reply)
    }
}
