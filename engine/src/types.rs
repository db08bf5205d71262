// ═══════════════════════════════════════════════════════════════════════
// Core types — ids, per-game state, players, turn/phase bookkeeping
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

use crate::log::MoveLog;
use crate::map::{self, NUM_TERRITORIES};

// ── Ids ────────────────────────────────────────────────────────────────
// Compact, copyable identifiers. Index into the static tables / state vecs.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TerritoryId(pub u8);

impl TerritoryId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Checked constructor for ids coming from outside the engine.
    pub fn new(raw: i64) -> Option<TerritoryId> {
        (0..NUM_TERRITORIES as i64).contains(&raw).then(|| TerritoryId(raw as u8))
    }
}

impl std::fmt::Display for TerritoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index into `GameState::continents` (standard continents first,
/// scenario-defined extras after them).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ContinentId(pub u8);

impl ContinentId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ── Enums ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Reinforce,
    Attack,
    Fortify,
    GameOver,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Reinforce => write!(f, "reinforce"),
            Phase::Attack => write!(f, "attack"),
            Phase::Fortify => write!(f, "fortify"),
            Phase::GameOver => write!(f, "game_over"),
        }
    }
}

// ── Territory (board tile) ─────────────────────────────────────────────

/// Dynamic per-territory state during a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryState {
    pub owner: Option<PlayerId>,
    pub armies: u32,
}

// ── Continent ──────────────────────────────────────────────────────────

/// A bonus group. The six standard continents are copied from the static
/// map at game creation; scenarios may append extra ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continent {
    pub name: String,
    pub bonus: u32,
    pub territories: Vec<TerritoryId>,
}

pub fn standard_continents() -> Vec<Continent> {
    map::CONTINENTS.iter()
        .map(|c| Continent {
            name: c.name.to_string(),
            bonus: c.bonus,
            territories: c.territories.to_vec(),
        })
        .collect()
}

// ── Player ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub color: String,
    pub is_human: bool,
    pub is_alive: bool,
    /// Armies still to place during the current reinforce phase.
    pub reinforcements: u32,
}

// ── Turn ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnInfo {
    pub player_index: usize,
    pub phase: Phase,
    /// Incremented every time control passes to the next player.
    pub turn_number: u32,
}

/// A capture waiting for its mandatory post-attack move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCapture {
    pub from: TerritoryId,
    pub to: TerritoryId,
    /// Committed armies that survived the attack.
    pub survivors: u32,
}

// ── Pending Decision Types ─────────────────────────────────────────────

/// What the current player owes the engine next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingDecision {
    /// Place the remaining reinforcement pool.
    PlaceReinforcements { player: PlayerId, remaining: u32 },
    /// Attack, or stop attacking.
    AttackOrEnd { player: PlayerId },
    /// Move armies into a freshly captured territory.
    MoveAfterCapture { player: PlayerId, capture: PendingCapture, max: u32 },
    /// Fortify once, or end the turn.
    FortifyOrEnd { player: PlayerId, fortified: bool },
}

// ── Game State ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Dynamic state per territory, indexed by TerritoryId.
    pub territories: Vec<TerritoryState>,
    /// Players, indexed by PlayerId.
    pub players: Vec<Player>,
    /// Standard continents followed by scenario extras.
    pub continents: Vec<Continent>,
    pub turn: TurnInfo,
    pub pending_capture: Option<PendingCapture>,
    /// Set once the current player has fortified this turn.
    pub fortified: bool,
    pub winner: Option<PlayerId>,
    pub log: MoveLog,
}

impl GameState {
    /// Empty board for `players`: nothing owned, reinforce phase for player 0.
    pub fn new(players: Vec<Player>) -> Self {
        GameState {
            territories: vec![TerritoryState::default(); NUM_TERRITORIES],
            players,
            continents: standard_continents(),
            turn: TurnInfo { player_index: 0, phase: Phase::Reinforce, turn_number: 1 },
            pending_capture: None,
            fortified: false,
            winner: None,
            log: MoveLog::default(),
        }
    }

    pub fn territory(&self, id: TerritoryId) -> &TerritoryState {
        &self.territories[id.index()]
    }

    pub fn territory_mut(&mut self, id: TerritoryId) -> &mut TerritoryState {
        &mut self.territories[id.index()]
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    /// Player whose turn it is.
    pub fn current_player(&self) -> PlayerId {
        self.players[self.turn.player_index].id
    }

    pub fn owner(&self, id: TerritoryId) -> Option<PlayerId> {
        self.territories[id.index()].owner
    }

    pub fn armies(&self, id: TerritoryId) -> u32 {
        self.territories[id.index()].armies
    }

    pub fn is_owned_by(&self, id: TerritoryId, player: PlayerId) -> bool {
        self.territories[id.index()].owner == Some(player)
    }

    /// Territories owned by `player`, in id order.
    pub fn owned_by(&self, player: PlayerId) -> Vec<TerritoryId> {
        self.territories.iter().enumerate()
            .filter(|(_, t)| t.owner == Some(player))
            .map(|(i, _)| TerritoryId(i as u8))
            .collect()
    }

    pub fn territory_count(&self, player: PlayerId) -> usize {
        self.territories.iter().filter(|t| t.owner == Some(player)).count()
    }

    pub fn alive_players(&self) -> Vec<PlayerId> {
        self.players.iter().filter(|p| p.is_alive).map(|p| p.id).collect()
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive).count()
    }

    /// True when `player` owns every territory of continent `c`.
    pub fn owns_continent(&self, player: PlayerId, c: ContinentId) -> bool {
        let continent = &self.continents[c.index()];
        !continent.territories.is_empty()
            && continent.territories.iter().all(|&t| self.is_owned_by(t, player))
    }

    pub fn is_over(&self) -> bool {
        self.turn.phase == Phase::GameOver
    }
}
