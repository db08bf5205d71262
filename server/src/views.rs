// Response shapes of the query operations.

use frisk_engine::map;
use frisk_engine::types::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerritoryView {
    pub tid: TerritoryId,
    pub name: &'static str,
    pub owning_player: Option<PlayerId>,
    pub current_armies: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub player_index: PlayerId,
    pub color: String,
    pub is_human: bool,
    pub is_alive: bool,
    pub reinforcements: u32,
    pub territories: usize,
}

/// All 42 territories, indexed by id.
pub fn territories(state: &GameState) -> Vec<TerritoryView> {
    map::all_territories()
        .map(|t| TerritoryView {
            tid: t,
            name: map::territory(t).key,
            owning_player: state.owner(t),
            current_armies: state.armies(t),
        })
        .collect()
}

pub fn players(state: &GameState) -> Vec<PlayerView> {
    state.players.iter()
        .map(|p| PlayerView {
            player_index: p.id,
            color: p.color.clone(),
            is_human: p.is_human,
            is_alive: p.is_alive,
            reinforcements: p.reinforcements,
            territories: state.territory_count(p.id),
        })
        .collect()
}
