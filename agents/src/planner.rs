// ═══════════════════════════════════════════════════════════════════════
// Pathfinder Agent — plans and plays a whole turn for a computer player.
//
// Turn outline:
//   1. Objectives: eliminate an opponent, or complete a continent.
//   2. Each objective gets a conquest forest (see `conquest`).
//   3. Selection: cheapest feasible elimination, otherwise the cheapest
//      continent; non-overlapping extras while the pool allows.
//   4. The pool is split over the chosen roots (see `allocation`).
//   5. Trees are executed depth first, one engine action at a time.
//   6. Follow-up: objectives that need no more armies are played too.
//   7. Fortify the weakest frontier from the strongest interior, end turn.
// ═══════════════════════════════════════════════════════════════════════

use std::collections::{HashSet, VecDeque};

use frisk_engine::engine::Action;
use frisk_engine::navigation;
use frisk_engine::types::*;
use tracing::debug;

use crate::agent::Agent;
use crate::allocation::{allocate, fallback_territory};
use crate::conquest::{grow_forest, Forest, Tree};

/// Re-plans per turn once the planned trees are done.
pub const MAX_FOLLOW_UPS: usize = 64;

// ── Objectives ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    Eliminate(PlayerId),
    Continent(ContinentId),
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub objective: Objective,
    pub bonus: u32,
    pub forest: Forest,
}

impl Candidate {
    pub fn requirement(&self) -> u32 {
        self.forest.requirement()
    }

    fn is_elimination(&self) -> bool {
        matches!(self.objective, Objective::Eliminate(_))
    }

    /// Ordering key: cheaper first, eliminations before continents, larger
    /// bonus, lower index.
    fn rank(&self) -> (u32, u8, std::cmp::Reverse<u32>, u8) {
        match self.objective {
            Objective::Eliminate(p) => (self.requirement(), 0, std::cmp::Reverse(0), p.0),
            Objective::Continent(c) => (self.requirement(), 1, std::cmp::Reverse(self.bonus), c.0),
        }
    }
}

/// Every objective open to `player`, each with its conquest forest.
pub fn candidates(state: &GameState, player: PlayerId) -> Vec<Candidate> {
    let mut out = Vec::new();
    for opponent in state.alive_players() {
        if opponent == player {
            continue;
        }
        let targets = state.owned_by(opponent);
        if let Some(forest) = grow_forest(state, player, &targets) {
            out.push(Candidate { objective: Objective::Eliminate(opponent), bonus: 0, forest });
        }
    }
    for (i, continent) in state.continents.iter().enumerate() {
        let c = ContinentId(i as u8);
        if state.owns_continent(player, c) {
            continue;
        }
        if let Some(forest) = grow_forest(state, player, &continent.territories) {
            out.push(Candidate { objective: Objective::Continent(c), bonus: continent.bonus, forest });
        }
    }
    out
}

/// Pick the objectives for a pool of `pool` armies.
pub fn select(mut candidates: Vec<Candidate>, pool: u32) -> Vec<Candidate> {
    candidates.sort_by_key(Candidate::rank);

    let primary = candidates.iter()
        .position(|c| c.is_elimination() && c.requirement() <= pool)
        .or_else(|| candidates.iter().position(|c| !c.is_elimination()));
    let Some(primary) = primary else { return Vec::new() };

    let first = candidates.remove(primary);
    let mut left = pool.saturating_sub(first.requirement());
    let mut used: HashSet<TerritoryId> = first.forest.territories();
    let mut chosen = vec![first];

    for c in candidates {
        let territories = c.forest.territories();
        if c.requirement() <= left && territories.is_disjoint(&used) {
            left -= c.requirement();
            used.extend(territories);
            chosen.push(c);
        }
    }
    chosen
}

/// Objectives that can be played with the armies already on the board.
pub fn select_ready(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.retain(|c| c.requirement() == 0 && !c.forest.trees.is_empty());
    candidates.sort_by_key(Candidate::rank);

    let mut used: HashSet<TerritoryId> = HashSet::new();
    let mut chosen = Vec::new();
    for c in candidates {
        let territories = c.forest.territories();
        if territories.is_disjoint(&used) {
            used.extend(territories);
            chosen.push(c);
        }
    }
    chosen
}

// ── Planning ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct TurnPlan {
    pub objectives: Vec<Objective>,
    pub placements: Vec<(TerritoryId, u32)>,
    pub trees: Vec<Tree>,
}

/// Plan reinforcements and attack trees for `player` with `pool` armies.
pub fn plan_turn(state: &GameState, player: PlayerId, pool: u32) -> TurnPlan {
    let chosen = select(candidates(state, player), pool);
    let objectives: Vec<Objective> = chosen.iter().map(|c| c.objective).collect();
    let trees: Vec<Tree> = chosen.into_iter().flat_map(|c| c.forest.trees).collect();

    let mut placements = if trees.is_empty() {
        Vec::new()
    } else {
        allocate(pool, &trees.iter().collect::<Vec<_>>())
    };
    if placements.is_empty() && pool > 0 {
        if let Some(t) = fallback_territory(state, player) {
            placements.push((t, pool));
        }
    }

    debug!(
        %player,
        pool,
        objectives = ?objectives,
        roots = ?trees.iter().map(|t| t.root.0).collect::<Vec<_>>(),
        "turn planned"
    );
    TurnPlan { objectives, placements, trees }
}

/// Everything but one army from the strongest interior territory to the
/// weakest frontier territory it connects to.
pub fn fortify_move(state: &GameState, player: PlayerId) -> Option<Action> {
    let from = state.owned_by(player).into_iter()
        .filter(|&t| state.armies(t) >= 2 && !navigation::is_frontier(state, t))
        .max_by(|a, b| state.armies(*a).cmp(&state.armies(*b)).then(b.cmp(a)))?;
    let reach = navigation::reachable_owned(state, from, player);
    let to = navigation::frontier(state, player).into_iter()
        .filter(|t| reach[t.index()])
        .min_by(|a, b| state.armies(*a).cmp(&state.armies(*b)).then(a.cmp(b)))?;
    Some(Action::Fortify { from, to, count: state.armies(from) - 1 })
}

/// Armies a freshly taken territory gets to finish the subtree below it,
/// with room for bad rolls.
fn comfortable(tree: &Tree, t: TerritoryId) -> u64 {
    2 * tree.need(t) as u64 + 1
}

/// Armies to move into `siblings[0]` right after taking it. `siblings` are
/// the children of the attacking territory still open, in attack order, and
/// `max` is what the attacker can spare.
///
/// When the attacker can give every open child a comfortable stack, each
/// child gets exactly that and the surplus stays on the attacker, next to
/// whatever is left to take. A last child that leads further gets it all.
/// Short of that the armies are split in proportion to need.
pub fn capture_share(tree: &Tree, siblings: &[TerritoryId], max: u32) -> u32 {
    let Some(&child) = siblings.first() else { return max };
    let last = siblings.len() == 1;
    if last && !tree.children(child).is_empty() {
        return max;
    }
    let wanted: u64 = siblings.iter().map(|&c| comfortable(tree, c)).sum();
    let share = if last || wanted <= max as u64 {
        comfortable(tree, child).min(max as u64)
    } else {
        let need_all: u64 = siblings.iter().map(|&c| tree.need(c) as u64).sum();
        if need_all == 0 { max as u64 } else { max as u64 * tree.need(child) as u64 / need_all }
    };
    (share as u32).clamp(1, max.max(1))
}

// ── Execution ──────────────────────────────────────────────────────────

/// A territory whose children are still to be conquered.
#[derive(Debug, Clone)]
struct Frame {
    at: TerritoryId,
    children: VecDeque<TerritoryId>,
}

pub struct PathfinderAgent {
    /// (turn number, player) the current plan belongs to.
    turn: Option<(u32, PlayerId)>,
    planned: bool,
    placements: VecDeque<(TerritoryId, u32)>,
    queued: VecDeque<Tree>,
    current: Option<Tree>,
    stack: Vec<Frame>,
    follow_ups: usize,
    exhausted: bool,
}

impl Default for PathfinderAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl PathfinderAgent {
    pub fn new() -> Self {
        PathfinderAgent {
            turn: None,
            planned: false,
            placements: VecDeque::new(),
            queued: VecDeque::new(),
            current: None,
            stack: Vec::new(),
            follow_ups: 0,
            exhausted: false,
        }
    }

    /// Drop the plan when a new turn (or another player) comes up.
    fn sync(&mut self, state: &GameState) {
        let key = (state.turn.turn_number, state.current_player());
        if self.turn != Some(key) {
            *self = PathfinderAgent::new();
            self.turn = Some(key);
        }
    }

    fn plan(&mut self, state: &GameState, pool: u32) {
        let plan = plan_turn(state, state.current_player(), pool);
        self.placements = plan.placements.into();
        self.queued = plan.trees.into();
        self.current = None;
        self.stack.clear();
        self.planned = true;
    }

    fn push_frame(&mut self, at: TerritoryId) {
        let children = self.current.as_ref()
            .map(|t| t.children(at).iter().copied().collect())
            .unwrap_or_default();
        self.stack.push(Frame { at, children });
    }

    /// Next attack of the planned trees, or None when they are all done.
    fn next_attack(&mut self, state: &GameState) -> Option<Action> {
        let me = state.current_player();
        loop {
            let Some(frame) = self.stack.last_mut() else {
                let tree = self.queued.pop_front()?;
                let root = tree.root;
                self.current = Some(tree);
                self.push_frame(root);
                continue;
            };
            let Some(&child) = frame.children.front() else {
                self.stack.pop();
                continue;
            };
            if state.is_owned_by(child, me) {
                frame.children.pop_front();
                self.push_frame(child);
                continue;
            }
            let at = frame.at;
            if !state.is_owned_by(at, me) || state.armies(at) < 2 {
                // abandon this subtree
                self.stack.pop();
                continue;
            }
            let armies = (state.armies(at) - 1).min(3);
            return Some(Action::Attack { from: at, to: child, armies });
        }
    }

    /// Queue objectives that are now free to take. False when none are.
    fn follow_up(&mut self, state: &GameState) -> bool {
        if self.exhausted || self.follow_ups >= MAX_FOLLOW_UPS {
            return false;
        }
        self.follow_ups += 1;
        let ready = select_ready(candidates(state, state.current_player()));
        if ready.is_empty() {
            self.exhausted = true;
            return false;
        }
        debug!(
            player = %state.current_player(),
            objectives = ?ready.iter().map(|c| c.objective).collect::<Vec<_>>(),
            "follow-up"
        );
        self.queued.extend(ready.into_iter().flat_map(|c| c.forest.trees));
        true
    }

    fn finish_turn(&mut self, state: &GameState) -> Action {
        let me = state.current_player();
        if state.fortified || navigation::attack_options(state, me).is_empty() {
            return Action::EndTurn;
        }
        fortify_move(state, me).unwrap_or(Action::EndTurn)
    }
}

impl Agent for PathfinderAgent {
    fn name(&self) -> &str { "Pathfinder" }

    fn place_reinforcements(&mut self, state: &GameState, remaining: u32) -> Action {
        self.sync(state);
        let planned_total: u32 = self.placements.iter().map(|p| p.1).sum();
        if !self.planned || planned_total != remaining {
            self.plan(state, remaining);
        }
        match self.placements.pop_front() {
            Some((tid, count)) => Action::Reinforce { tid, count },
            None => {
                let tid = fallback_territory(state, state.current_player()).unwrap_or(TerritoryId(0));
                Action::Reinforce { tid, count: remaining }
            }
        }
    }

    fn attack_or_end(&mut self, state: &GameState) -> Action {
        self.sync(state);
        if !self.planned {
            self.plan(state, 0);
        }
        loop {
            if let Some(action) = self.next_attack(state) {
                return action;
            }
            if !self.follow_up(state) {
                return self.finish_turn(state);
            }
        }
    }

    fn move_after_capture(&mut self, state: &GameState, capture: PendingCapture, max: u32) -> u32 {
        self.sync(state);
        let Some(frame) = self.stack.last_mut() else { return max };
        if frame.at != capture.from || frame.children.front() != Some(&capture.to) {
            return max;
        }
        let siblings: Vec<TerritoryId> = frame.children.iter().copied().collect();
        let count = match &self.current {
            Some(tree) => capture_share(tree, &siblings, max),
            None => max,
        };
        frame.children.pop_front();
        self.push_frame(capture.to);
        count
    }

    fn fortify_or_end(&mut self, state: &GameState, fortified: bool) -> Action {
        self.sync(state);
        if fortified {
            return Action::EndTurn;
        }
        fortify_move(state, state.current_player()).unwrap_or(Action::EndTurn)
    }
}
