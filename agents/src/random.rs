// ═══════════════════════════════════════════════════════════════════════
// Random Agent — makes all decisions randomly among legal moves.
// Baseline opponent for self-play and fuzzing the engine.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use frisk_engine::engine::Action;
use frisk_engine::map;
use frisk_engine::navigation;
use frisk_engine::types::*;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use rand::SeedableRng;

pub struct RandomAgent {
    rng: ChaCha8Rng,
    /// Chance of stopping the attack phase at each decision.
    stop_chance: f64,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        RandomAgent {
            rng: ChaCha8Rng::seed_from_u64(seed),
            stop_chance: 0.15,
        }
    }

    /// Random legal fortification for the current player, if any.
    fn random_fortify(&mut self, state: &GameState) -> Option<Action> {
        let player = state.current_player();
        let sources: Vec<TerritoryId> = state.owned_by(player).into_iter()
            .filter(|&t| state.armies(t) >= 2)
            .collect();
        let &from = sources.choose(&mut self.rng)?;
        let reach = navigation::reachable_owned(state, from, player);
        let targets: Vec<TerritoryId> = map::all_territories()
            .filter(|&t| t != from && reach[t.index()])
            .collect();
        let &to = targets.choose(&mut self.rng)?;
        let count = self.rng.gen_range(1..state.armies(from));
        Some(Action::Fortify { from, to, count })
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str { "Random" }

    fn place_reinforcements(&mut self, state: &GameState, remaining: u32) -> Action {
        let owned = state.owned_by(state.current_player());
        let tid = owned.choose(&mut self.rng).copied().unwrap_or(TerritoryId(0));
        let count = self.rng.gen_range(1..=remaining.max(1));
        Action::Reinforce { tid, count }
    }

    fn attack_or_end(&mut self, state: &GameState) -> Action {
        let options = navigation::attack_options(state, state.current_player());
        if options.is_empty() || self.rng.gen_bool(self.stop_chance) {
            return match self.rng.gen_bool(0.5) {
                true => self.random_fortify(state).unwrap_or(Action::EndAttack),
                false => Action::EndAttack,
            };
        }
        let &(from, to) = &options[self.rng.gen_range(0..options.len())];
        let max = (state.armies(from) - 1).min(3);
        Action::Attack { from, to, armies: self.rng.gen_range(1..=max) }
    }

    fn move_after_capture(&mut self, _state: &GameState, _capture: PendingCapture, max: u32) -> u32 {
        self.rng.gen_range(1..=max.max(1))
    }

    fn fortify_or_end(&mut self, state: &GameState, fortified: bool) -> Action {
        if !fortified && self.rng.gen_bool(0.5) {
            if let Some(action) = self.random_fortify(state) {
                return action;
            }
        }
        Action::EndTurn
    }
}
