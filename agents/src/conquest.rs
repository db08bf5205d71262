// ═══════════════════════════════════════════════════════════════════════
// Conquest forests — where to attack from and in which order.
//
// For a set of target territories a forest of attack trees is grown
// greedily. Each round runs one multi-source Dijkstra over territories the
// player does not own; entering territory `t` costs `armies(t) + 1` (its
// defenders plus the army that stays behind). Sources are
//   * nodes already in the forest (roots included), starting at 0, and
//   * owned territories not yet used as a root, starting at minus their
//     spare armies (`armies - 1`).
// The cheapest uncovered target and the path to it join the forest; ties
// go to extending the forest over opening a new root, then to the lower
// territory id. Paths may cross territories that are not targets.
// ═══════════════════════════════════════════════════════════════════════

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use frisk_engine::map::{self, NUM_TERRITORIES};
use frisk_engine::types::*;

/// Armies it takes to take `t` and hold it.
pub fn entry_cost(state: &GameState, t: TerritoryId) -> u32 {
    state.armies(t) + 1
}

// ── Trees ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Tree {
    /// Owned territory the attacks start from.
    pub root: TerritoryId,
    /// Conquered territories in the order they joined the tree.
    pub nodes: Vec<TerritoryId>,
    children: HashMap<TerritoryId, Vec<TerritoryId>>,
    entry: HashMap<TerritoryId, u32>,
    /// Armies missing on the root to take the whole tree, at plan time.
    pub requirement: u32,
}

impl Tree {
    fn new(root: TerritoryId) -> Self {
        Tree { root, nodes: Vec::new(), children: HashMap::new(), entry: HashMap::new(), requirement: 0 }
    }

    fn attach(&mut self, parent: TerritoryId, node: TerritoryId, cost: u32) {
        self.children.entry(parent).or_default().push(node);
        self.entry.insert(node, cost);
        self.nodes.push(node);
    }

    pub fn children(&self, t: TerritoryId) -> &[TerritoryId] {
        self.children.get(&t).map_or(&[], Vec::as_slice)
    }

    /// Sum of entry costs over the whole tree.
    pub fn cost(&self) -> u32 {
        self.entry.values().sum()
    }

    /// Entry cost of the subtree hanging at `t` (`t` included unless it
    /// is the root).
    pub fn need(&self, t: TerritoryId) -> u32 {
        let own = self.entry.get(&t).copied().unwrap_or(0);
        own + self.children(t).iter().map(|&c| self.need(c)).sum::<u32>()
    }
}

#[derive(Debug, Clone)]
pub struct Forest {
    pub trees: Vec<Tree>,
}

impl Forest {
    pub fn requirement(&self) -> u32 {
        self.trees.iter().map(|t| t.requirement).sum()
    }

    pub fn cost(&self) -> u32 {
        self.trees.iter().map(Tree::cost).sum()
    }

    /// Every territory the forest touches, roots included.
    pub fn territories(&self) -> HashSet<TerritoryId> {
        self.trees.iter()
            .flat_map(|t| std::iter::once(t.root).chain(t.nodes.iter().copied()))
            .collect()
    }
}

// ── Search state ───────────────────────────────────────────────────────

const EXTEND: u8 = 0;
const NEW_ROOT: u8 = 1;

/// Dijkstra label: distance, then source kind, then source id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Label {
    dist: i64,
    kind: u8,
    source: TerritoryId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    label: Label,
    node: TerritoryId,
}

// Flipped so BinaryHeap pops the smallest label first.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.label.cmp(&self.label).then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Search {
    label: [Option<Label>; NUM_TERRITORIES],
    parent: [Option<TerritoryId>; NUM_TERRITORIES],
}

/// One multi-source Dijkstra from the current forest and the unused roots.
fn search(state: &GameState, player: PlayerId, tree_of: &HashMap<TerritoryId, usize>) -> Search {
    let mut s = Search { label: [None; NUM_TERRITORIES], parent: [None; NUM_TERRITORIES] };
    let mut heap = BinaryHeap::new();
    let mut settled = [false; NUM_TERRITORIES];

    for t in map::all_territories() {
        let label = if tree_of.contains_key(&t) {
            Label { dist: 0, kind: EXTEND, source: t }
        } else if state.is_owned_by(t, player) {
            Label { dist: -(state.armies(t) as i64 - 1), kind: NEW_ROOT, source: t }
        } else {
            continue;
        };
        s.label[t.index()] = Some(label);
        heap.push(Entry { label, node: t });
    }

    while let Some(Entry { label, node }) = heap.pop() {
        if settled[node.index()] {
            continue;
        }
        settled[node.index()] = true;

        for &adj in map::neighbors(node) {
            // owned and forest territories are sources, never crossed
            if settled[adj.index()] || state.is_owned_by(adj, player) || tree_of.contains_key(&adj) {
                continue;
            }
            let next = Label { dist: label.dist + entry_cost(state, adj) as i64, ..label };
            if s.label[adj.index()].map_or(true, |cur| next < cur) {
                s.label[adj.index()] = Some(next);
                s.parent[adj.index()] = Some(node);
                heap.push(Entry { label: next, node: adj });
            }
        }
    }
    s
}

// ── Forest growth ──────────────────────────────────────────────────────

/// Grow a forest covering every target not owned by `player`.
/// Returns None when `player` owns nothing to attack from.
pub fn grow_forest(state: &GameState, player: PlayerId, targets: &[TerritoryId]) -> Option<Forest> {
    let mut uncovered: Vec<TerritoryId> = targets.iter()
        .copied()
        .filter(|&t| !state.is_owned_by(t, player))
        .collect();
    uncovered.sort_unstable();
    uncovered.dedup();

    let mut trees: Vec<Tree> = Vec::new();
    let mut tree_of: HashMap<TerritoryId, usize> = HashMap::new();

    while !uncovered.is_empty() {
        let found = search(state, player, &tree_of);

        let target = uncovered.iter()
            .copied()
            .filter_map(|t| found.label[t.index()].map(|l| (l.dist, l.kind, t)))
            .min()?
            .2;
        let label = found.label[target.index()]?;

        // Walk back to the source; the path excludes it.
        let mut path = vec![target];
        let mut cur = target;
        while let Some(prev) = found.parent[cur.index()] {
            if prev == label.source {
                break;
            }
            path.push(prev);
            cur = prev;
        }
        path.reverse();

        let idx = match tree_of.get(&label.source) {
            Some(&idx) => idx,
            None => {
                trees.push(Tree::new(label.source));
                tree_of.insert(label.source, trees.len() - 1);
                trees.len() - 1
            }
        };
        let mut parent = label.source;
        for &node in &path {
            trees[idx].attach(parent, node, entry_cost(state, node));
            tree_of.insert(node, idx);
            parent = node;
        }
        uncovered.retain(|t| !path.contains(t));
    }

    for tree in &mut trees {
        let spare = state.armies(tree.root) as i64;
        tree.requirement = (tree.cost() as i64 + 1 - spare).max(0) as u32;
    }
    Some(Forest { trees })
}
