// ═══════════════════════════════════════════════════════════════════════
// Agent Trait — interface that all computer players implement
//
// Agents see the whole GameState (there is no hidden information in
// frisk) and answer the decision the engine is waiting for. They never
// mutate state: the driver applies the returned action.
// ═══════════════════════════════════════════════════════════════════════

use frisk_engine::engine::{pending, Action};
use frisk_engine::types::*;

pub trait Agent: Send + Sync {
    /// Human-readable name for this agent (e.g. "Pathfinder", "Random").
    fn name(&self) -> &str;

    /// Answer the current pending decision. None once the game is over.
    fn decide(&mut self, state: &GameState) -> Option<Action> {
        let action = match pending(state)? {
            PendingDecision::PlaceReinforcements { remaining, .. } => {
                self.place_reinforcements(state, remaining)
            }
            PendingDecision::AttackOrEnd { .. } => self.attack_or_end(state),
            PendingDecision::MoveAfterCapture { capture, max, .. } => Action::PostAttackMove {
                from: capture.from,
                to: capture.to,
                count: self.move_after_capture(state, capture, max),
            },
            PendingDecision::FortifyOrEnd { fortified, .. } => self.fortify_or_end(state, fortified),
        };
        Some(action)
    }

    // ── Individual decision methods ────────────────────────────────────

    /// Place some or all of the remaining pool. Must return `Reinforce`.
    fn place_reinforcements(&mut self, state: &GameState, remaining: u32) -> Action;

    /// Attack, fortify, end the attack phase or end the turn.
    fn attack_or_end(&mut self, state: &GameState) -> Action;

    /// Armies to move into a captured territory, in `1..=max`.
    fn move_after_capture(&mut self, state: &GameState, capture: PendingCapture, max: u32) -> u32;

    /// Fortify (if not done yet) or end the turn.
    fn fortify_or_end(&mut self, state: &GameState, fortified: bool) -> Action;
}
