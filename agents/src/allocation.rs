// ═══════════════════════════════════════════════════════════════════════
// Reinforcement allocation — splitting the pool over attack roots
// ═══════════════════════════════════════════════════════════════════════

use frisk_engine::navigation;
use frisk_engine::types::*;

use crate::conquest::Tree;

/// Split `total` proportionally to `weights` with the largest remainder
/// method. Leftover units go to the largest fractional parts, earlier
/// entries first on ties. With all weights zero the first entry gets
/// everything.
pub fn largest_remainder(total: u32, weights: &[u32]) -> Vec<u32> {
    if weights.is_empty() {
        return Vec::new();
    }
    let sum: u64 = weights.iter().map(|&w| w as u64).sum();
    let mut shares = vec![0u32; weights.len()];
    if sum == 0 {
        shares[0] = total;
        return shares;
    }

    let mut remainders: Vec<(u64, usize)> = Vec::with_capacity(weights.len());
    let mut given = 0u32;
    for (i, &w) in weights.iter().enumerate() {
        let exact = total as u64 * w as u64;
        shares[i] = (exact / sum) as u32;
        given += shares[i];
        remainders.push((exact % sum, i));
    }
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, i) in remainders.iter().take((total - given) as usize) {
        shares[i] += 1;
    }
    shares
}

/// Pool split over tree roots: by requirement, or by tree cost when every
/// requirement is already met. Returns only non-zero placements, in tree
/// order.
pub fn allocate(pool: u32, trees: &[&Tree]) -> Vec<(TerritoryId, u32)> {
    let mut weights: Vec<u32> = trees.iter().map(|t| t.requirement).collect();
    if weights.iter().all(|&w| w == 0) {
        weights = trees.iter().map(|t| t.cost()).collect();
    }
    largest_remainder(pool, &weights).into_iter()
        .zip(trees)
        .filter(|(n, _)| *n > 0)
        .map(|(n, t)| (t.root, n))
        .collect()
}

/// Where the pool goes when there is nothing to plan for: the strongest
/// frontier territory, or the first owned one.
pub fn fallback_territory(state: &GameState, player: PlayerId) -> Option<TerritoryId> {
    navigation::frontier(state, player).into_iter()
        .max_by(|a, b| state.armies(*a).cmp(&state.armies(*b)).then(b.cmp(a)))
        .or_else(|| state.owned_by(player).first().copied())
}
