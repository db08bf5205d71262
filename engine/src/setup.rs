// ═══════════════════════════════════════════════════════════════════════
// Game setup — scenario loading and random initial deals
// ═══════════════════════════════════════════════════════════════════════

use crate::error::EngineError;
use crate::map::{self, NUM_TERRITORIES};
use crate::reinforcement::reinforcement_pool;
use crate::types::*;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const MAX_PLAYERS: usize = 6;
pub const DEFAULT_COLORS: [&str; MAX_PLAYERS] = ["red", "blue", "green", "yellow", "purple", "black"];
/// Largest army count, continent bonus or pool a scenario may carry.
/// Keeps every board total far below `u32::MAX`.
pub const MAX_SCENARIO_ARMIES: u32 = 1_000_000;

// ── Scenario schema ────────────────────────────────────────────────────
// One JSON object per fixture. Field names of the territory and turn
// tables also accept the long forms used by `get_territories` output.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub players: Vec<PlayerSpec>,
    pub territories: TerritoryTable,
    #[serde(default)]
    pub turn: Option<TurnSpec>,
    #[serde(default)]
    pub continents: Vec<ContinentSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub color: String,
    #[serde(default)]
    pub is_human: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TerritoryTable {
    List(Vec<TerritorySpec>),
    ByName(BTreeMap<String, TerritorySpec>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritorySpec {
    #[serde(alias = "owning_player")]
    pub owner: i64,
    #[serde(alias = "current_armies")]
    pub armies: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnSpec {
    #[serde(alias = "current_player")]
    pub player_index: usize,
    #[serde(default)]
    pub phase: Option<Phase>,
    /// Pool left to place; computed from the board when absent.
    #[serde(default)]
    pub reinforcements: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinentSpec {
    pub name: String,
    pub bonus: u32,
    pub territories: Vec<TerritoryRef>,
}

/// A territory named either by id or by snake_case key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TerritoryRef {
    Id(i64),
    Key(String),
}

impl TerritoryRef {
    fn resolve(&self) -> Result<TerritoryId, EngineError> {
        match self {
            TerritoryRef::Id(raw) => TerritoryId::new(*raw)
                .ok_or_else(|| invalid(format!("territory id {raw} out of range"))),
            TerritoryRef::Key(key) => map::territory_by_key(key)
                .ok_or_else(|| invalid(format!("unknown territory {key:?}"))),
        }
    }
}

fn invalid(msg: impl Into<String>) -> EngineError {
    EngineError::InvalidScenario(msg.into())
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Scenario, EngineError> {
        serde_json::from_str(text).map_err(|e| invalid(e.to_string()))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Scenario, EngineError> {
        serde_json::from_value(value).map_err(|e| invalid(e.to_string()))
    }
}

// ── Loading ────────────────────────────────────────────────────────────

/// Build a game from a scenario. Every territory must be owned by a listed
/// player and hold at least one army; alive flags follow ownership.
pub fn load_scenario(scenario: &Scenario) -> Result<GameState, EngineError> {
    let n = scenario.players.len();
    if n == 0 || n > MAX_PLAYERS {
        return Err(invalid(format!("expected 1..={MAX_PLAYERS} players, got {n}")));
    }

    let players: Vec<Player> = scenario.players.iter().enumerate()
        .map(|(i, p)| Player {
            id: PlayerId(i as u8),
            color: p.color.clone(),
            is_human: p.is_human,
            is_alive: false,
            reinforcements: 0,
        })
        .collect();
    let mut state = GameState::new(players);

    let specs = territory_specs(&scenario.territories)?;
    for (i, spec) in specs.iter().enumerate() {
        if spec.owner < 0 || spec.owner as usize >= n {
            return Err(invalid(format!(
                "territory {} owned by unknown player {}", map::TERRITORIES[i].key, spec.owner
            )));
        }
        if spec.armies < 1 {
            return Err(invalid(format!(
                "territory {} must hold at least one army", map::TERRITORIES[i].key
            )));
        }
        if spec.armies > MAX_SCENARIO_ARMIES as i64 {
            return Err(invalid(format!(
                "territory {} holds {} armies, more than {MAX_SCENARIO_ARMIES}", map::TERRITORIES[i].key, spec.armies
            )));
        }
        state.territories[i] = TerritoryState {
            owner: Some(PlayerId(spec.owner as u8)),
            armies: spec.armies as u32,
        };
    }

    let mut names: HashSet<String> = state.continents.iter().map(|c| c.name.clone()).collect();
    for extra in &scenario.continents {
        if !names.insert(extra.name.clone()) {
            return Err(invalid(format!("duplicate continent {:?}", extra.name)));
        }
        let mut territories = Vec::with_capacity(extra.territories.len());
        for r in &extra.territories {
            let tid = r.resolve()?;
            if !territories.contains(&tid) {
                territories.push(tid);
            }
        }
        if territories.is_empty() {
            return Err(invalid(format!("continent {:?} has no territories", extra.name)));
        }
        if extra.bonus > MAX_SCENARIO_ARMIES {
            return Err(invalid(format!("continent {:?} bonus {} too large", extra.name, extra.bonus)));
        }
        state.continents.push(Continent { name: extra.name.clone(), bonus: extra.bonus, territories });
    }

    refresh_alive(&mut state);

    let turn = scenario.turn.clone().unwrap_or(TurnSpec { player_index: 0, phase: None, reinforcements: None });
    if turn.player_index >= n {
        return Err(invalid(format!("turn player {} out of range", turn.player_index)));
    }
    state.turn.player_index = turn.player_index;

    if state.alive_count() <= 1 {
        state.turn.phase = Phase::GameOver;
        state.winner = state.alive_players().first().copied();
        return Ok(state);
    }
    if !state.players[turn.player_index].is_alive {
        return Err(invalid(format!("turn player {} owns no territory", turn.player_index)));
    }

    let phase = turn.phase.unwrap_or(Phase::Reinforce);
    if phase == Phase::GameOver {
        return Err(invalid("game_over phase with more than one player alive"));
    }
    let current = state.current_player();
    state.turn.phase = phase;
    if phase == Phase::Reinforce {
        let pool = turn.reinforcements.unwrap_or_else(|| reinforcement_pool(&state, current));
        if pool > MAX_SCENARIO_ARMIES {
            return Err(invalid(format!("reinforcement pool {pool} too large")));
        }
        state.player_mut(current).reinforcements = pool;
        if pool == 0 {
            state.turn.phase = Phase::Attack;
        }
    }
    Ok(state)
}

fn territory_specs(table: &TerritoryTable) -> Result<Vec<TerritorySpec>, EngineError> {
    match table {
        TerritoryTable::List(list) => {
            if list.len() != NUM_TERRITORIES {
                return Err(invalid(format!("expected {NUM_TERRITORIES} territories, got {}", list.len())));
            }
            Ok(list.clone())
        }
        TerritoryTable::ByName(by_name) => {
            let mut slots: Vec<Option<TerritorySpec>> = vec![None; NUM_TERRITORIES];
            for (key, spec) in by_name {
                let tid = map::territory_by_key(key)
                    .ok_or_else(|| invalid(format!("unknown territory {key:?}")))?;
                if slots[tid.index()].replace(*spec).is_some() {
                    return Err(invalid(format!("territory {key:?} listed twice")));
                }
            }
            slots.into_iter().enumerate()
                .map(|(i, s)| s.ok_or_else(|| invalid(format!("missing territory {}", map::TERRITORIES[i].key))))
                .collect()
        }
    }
}

/// Recompute alive flags from ownership.
pub fn refresh_alive(state: &mut GameState) {
    let mut owns = vec![false; state.players.len()];
    for t in &state.territories {
        if let Some(owner) = t.owner {
            owns[owner.index()] = true;
        }
    }
    for (player, alive) in state.players.iter_mut().zip(owns) {
        player.is_alive = alive;
    }
}

/// Snapshot the board back into scenario form.
pub fn to_scenario(state: &GameState) -> Scenario {
    Scenario {
        players: state.players.iter()
            .map(|p| PlayerSpec { color: p.color.clone(), is_human: p.is_human })
            .collect(),
        territories: TerritoryTable::List(state.territories.iter()
            .map(|t| TerritorySpec {
                owner: t.owner.map_or(-1, |p| p.0 as i64),
                armies: t.armies as i64,
            })
            .collect()),
        turn: Some(TurnSpec {
            player_index: state.turn.player_index,
            phase: Some(state.turn.phase),
            reinforcements: Some(state.players[state.turn.player_index].reinforcements),
        }),
        continents: state.continents.iter().skip(map::NUM_CONTINENTS)
            .map(|c| ContinentSpec {
                name: c.name.clone(),
                bonus: c.bonus,
                territories: c.territories.iter().map(|t| TerritoryRef::Id(t.0 as i64)).collect(),
            })
            .collect(),
    }
}

// ── Random deal ────────────────────────────────────────────────────────

/// Standard starting armies per player by player count.
pub fn starting_armies(player_count: usize) -> u32 {
    match player_count {
        2 => 40,
        3 => 35,
        4 => 30,
        5 => 25,
        _ => 20,
    }
}

/// Deal all territories round-robin in shuffled order, one army each, then
/// scatter each player's remaining starting armies over their territories.
/// All players are computer players.
pub fn create_random_game(player_count: usize, seed: u64) -> Result<GameState, EngineError> {
    if !(2..=MAX_PLAYERS).contains(&player_count) {
        return Err(invalid(format!("random games need 2..={MAX_PLAYERS} players")));
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let players = (0..player_count)
        .map(|i| Player {
            id: PlayerId(i as u8),
            color: DEFAULT_COLORS[i].to_string(),
            is_human: false,
            is_alive: true,
            reinforcements: 0,
        })
        .collect();
    let mut state = GameState::new(players);

    let mut order: Vec<TerritoryId> = map::all_territories().collect();
    order.shuffle(&mut rng);
    for (i, tid) in order.iter().enumerate() {
        *state.territory_mut(*tid) = TerritoryState { owner: Some(PlayerId((i % player_count) as u8)), armies: 1 };
    }

    for p in 0..player_count {
        let player = PlayerId(p as u8);
        let owned = state.owned_by(player);
        let extra = starting_armies(player_count).saturating_sub(owned.len() as u32);
        for _ in 0..extra {
            let tid = owned[rng.gen_range(0..owned.len())];
            state.territory_mut(tid).armies += 1;
        }
    }

    let first = state.current_player();
    state.player_mut(first).reinforcements = reinforcement_pool(&state, first);
    Ok(state)
}
