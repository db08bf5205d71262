// ═══════════════════════════════════════════════════════════════════════
// Reinforcement — pool size at the start of a player's turn
// ═══════════════════════════════════════════════════════════════════════

use crate::types::*;

pub const MIN_REINFORCEMENTS: u32 = 3;

/// Base pool from territory count: one army per three territories, at least 3.
pub fn territory_reinforcements(owned: usize) -> u32 {
    ((owned / 3) as u32).max(MIN_REINFORCEMENTS)
}

/// Continents (standard and scenario extras) fully held by `player`.
pub fn owned_continents(state: &GameState, player: PlayerId) -> Vec<ContinentId> {
    (0..state.continents.len())
        .map(|i| ContinentId(i as u8))
        .filter(|&c| state.owns_continent(player, c))
        .collect()
}

pub fn continent_bonus(state: &GameState, player: PlayerId) -> u32 {
    owned_continents(state, player).iter()
        .map(|c| state.continents[c.index()].bonus)
        .sum()
}

/// Full pool: territory base plus the bonus of every fully owned continent.
pub fn reinforcement_pool(state: &GameState, player: PlayerId) -> u32 {
    territory_reinforcements(state.territory_count(player)) + continent_bonus(state, player)
}
