// ═══════════════════════════════════════════════════════════════════════
// Navigation — fortify connectivity, frontiers, attack options
// ═══════════════════════════════════════════════════════════════════════

use crate::map::{self, NUM_TERRITORIES};
use crate::types::*;
use std::collections::VecDeque;

/// Check if armies can walk from `from` to `to` through territories owned
/// by `player` (both endpoints included).
pub fn is_connected(state: &GameState, from: TerritoryId, to: TerritoryId, player: PlayerId) -> bool {
    if !state.is_owned_by(from, player) || !state.is_owned_by(to, player) {
        return false;
    }
    if from == to {
        return true;
    }
    reachable_owned(state, from, player)[to.index()]
}

/// BFS over `player`'s territories starting at `start`.
/// Returns a visited mask indexed by territory id.
pub fn reachable_owned(state: &GameState, start: TerritoryId, player: PlayerId) -> Vec<bool> {
    let mut visited = vec![false; NUM_TERRITORIES];
    if !state.is_owned_by(start, player) {
        return visited;
    }

    let mut queue: VecDeque<TerritoryId> = VecDeque::new();
    queue.push_back(start);
    visited[start.index()] = true;

    while let Some(current) = queue.pop_front() {
        for &adj in map::neighbors(current) {
            if visited[adj.index()] || !state.is_owned_by(adj, player) {
                continue;
            }
            visited[adj.index()] = true;
            queue.push_back(adj);
        }
    }
    visited
}

/// Borders at least one territory not owned by its owner.
pub fn is_frontier(state: &GameState, tid: TerritoryId) -> bool {
    let owner = state.owner(tid);
    map::neighbors(tid).iter().any(|&adj| state.owner(adj) != owner)
}

pub fn frontier(state: &GameState, player: PlayerId) -> Vec<TerritoryId> {
    state.owned_by(player).into_iter()
        .filter(|&t| is_frontier(state, t))
        .collect()
}

/// Enemy territories adjacent to `from` (empty unless `from` can attack,
/// i.e. holds at least 2 armies).
pub fn attack_targets(state: &GameState, from: TerritoryId) -> Vec<TerritoryId> {
    let Some(owner) = state.owner(from) else { return Vec::new() };
    if state.armies(from) < 2 {
        return Vec::new();
    }
    map::neighbors(from).iter()
        .copied()
        .filter(|&adj| state.owner(adj).is_some_and(|o| o != owner))
        .collect()
}

/// Every (from, to) pair `player` could attack right now.
pub fn attack_options(state: &GameState, player: PlayerId) -> Vec<(TerritoryId, TerritoryId)> {
    let mut out = Vec::new();
    for from in state.owned_by(player) {
        for to in attack_targets(state, from) {
            out.push((from, to));
        }
    }
    out
}
