// ═══════════════════════════════════════════════════════════════════════
// Combat — a single dice round between an attacking and a defending stack
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

use crate::dice::DiceQueue;
use crate::error::DiceError;

pub const MAX_ATTACK_DICE: u32 = 3;
pub const MAX_DEFEND_DICE: u32 = 2;

/// Result of one round. Dice are sorted descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub attacker_losses: u32,
    pub defender_losses: u32,
    pub attacker_dice: Vec<u8>,
    pub defender_dice: Vec<u8>,
}

/// Number of dice a round between these stacks draws.
pub fn dice_needed(attacking: u32, defending: u32) -> usize {
    (attacking.min(MAX_ATTACK_DICE) + defending.min(MAX_DEFEND_DICE)) as usize
}

/// Resolve one round. `attacking` is the number of committed armies still
/// in the fight, `defending` the armies on the defended territory; both
/// must be at least 1.
///
/// Values are drawn attacker dice first, then defender dice. Pairs are
/// compared highest to highest and the defender wins ties. Fails without
/// drawing anything if the queue cannot supply the whole round.
pub fn resolve_round(attacking: u32, defending: u32, dice: &mut DiceQueue) -> Result<RoundOutcome, DiceError> {
    debug_assert!(attacking >= 1 && defending >= 1);
    let a_n = attacking.min(MAX_ATTACK_DICE) as usize;
    let d_n = defending.min(MAX_DEFEND_DICE) as usize;

    let mut drawn = dice.take(a_n + d_n)?;
    let mut defender_dice = drawn.split_off(a_n);
    let mut attacker_dice = drawn;
    attacker_dice.sort_unstable_by(|a, b| b.cmp(a));
    defender_dice.sort_unstable_by(|a, b| b.cmp(a));

    let mut attacker_losses = 0;
    let mut defender_losses = 0;
    for (a, d) in attacker_dice.iter().zip(defender_dice.iter()) {
        if a > d {
            defender_losses += 1;
        } else {
            attacker_losses += 1;
        }
    }

    Ok(RoundOutcome { attacker_losses, defender_losses, attacker_dice, defender_dice })
}
