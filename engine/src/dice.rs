// ═══════════════════════════════════════════════════════════════════════
// Dice queue — externally seeded, consumed front to back.
// Nothing in the engine rolls its own dice: every value comes from here.
// ═══════════════════════════════════════════════════════════════════════

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::DiceError;

/// Below this many values a driver with auto-replenish tops the queue up.
pub const LOW_DICE: usize = 500;

/// Length of a generated standard dice file.
pub const STANDARD_DICE_LEN: usize = 1000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiceQueue {
    values: VecDeque<u8>,
    /// Replenishment seed (the standard dice file), if one was loaded.
    standard: Vec<u8>,
}

impl DiceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue holding `values`, validated.
    pub fn from_values(values: &[i64]) -> Result<Self, DiceError> {
        let mut q = DiceQueue::new();
        q.push(values)?;
        Ok(q)
    }

    /// Append `values` to the back. Rejects the whole batch if any value
    /// is not a die face.
    pub fn push(&mut self, values: &[i64]) -> Result<(), DiceError> {
        let faces = to_faces(values)?;
        self.values.extend(faces);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u8, DiceError> {
        self.values.pop_front().ok_or(DiceError::EmptyQueue)
    }

    /// Draw exactly `n` values, or none at all.
    pub fn take(&mut self, n: usize) -> Result<Vec<u8>, DiceError> {
        if self.values.len() < n {
            return Err(DiceError::InsufficientDice { needed: n, remaining: self.values.len() });
        }
        Ok(self.values.drain(..n).collect())
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Values still queued, front first.
    pub fn peek_all(&self) -> impl Iterator<Item = u8> + '_ {
        self.values.iter().copied()
    }

    // ── Standard seed ──────────────────────────────────────────────────

    pub fn set_standard(&mut self, values: &[i64]) -> Result<(), DiceError> {
        self.standard = to_faces(values)?;
        Ok(())
    }

    pub fn standard(&self) -> &[u8] {
        &self.standard
    }

    /// Clear the queue and push the standard seed.
    pub fn reset_to_standard(&mut self) {
        self.values.clear();
        self.values.extend(self.standard.iter().copied());
    }

    /// Append the standard seed when fewer than `LOW_DICE` values remain.
    /// Returns how many values were added.
    pub fn replenish_if_low(&mut self) -> usize {
        if self.values.len() >= LOW_DICE || self.standard.is_empty() {
            return 0;
        }
        self.values.extend(self.standard.iter().copied());
        self.standard.len()
    }
}

fn to_faces(values: &[i64]) -> Result<Vec<u8>, DiceError> {
    values.iter()
        .map(|&v| if (1..=6).contains(&v) { Ok(v as u8) } else { Err(DiceError::InvalidDie(v)) })
        .collect()
}

// ── Dice files ─────────────────────────────────────────────────────────

/// Parse a dice file: integer literals separated by commas and/or
/// whitespace, optionally wrapped in `[` `]`.
pub fn parse_dice_file(text: &str) -> Result<Vec<i64>, DiceError> {
    let body = text.trim();
    let body = body.strip_prefix('[').unwrap_or(body);
    let body = body.strip_suffix(']').unwrap_or(body);

    let mut out = Vec::new();
    for token in body.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let v: i64 = token.parse()
            .map_err(|_| DiceError::Parse(format!("not an integer: {token:?}")))?;
        if !(1..=6).contains(&v) {
            return Err(DiceError::InvalidDie(v));
        }
        out.push(v);
    }
    if out.is_empty() {
        return Err(DiceError::Parse("no dice values".into()));
    }
    Ok(out)
}

/// Deterministic standard seed of `len` values.
pub fn generate_standard(seed: u64, len: usize) -> Vec<i64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(1..=6)).collect()
}

/// Render values the way `parse_dice_file` reads them.
pub fn format_dice_file(values: &[i64]) -> String {
    let body: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]\n", body.join(","))
}
