use thiserror::Error;

use crate::types::{PlayerId, TerritoryId};

/// Failures of the dice queue. Raised before any value is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("dice queue is empty")]
    EmptyQueue,

    #[error("not enough dice: round needs {needed}, {remaining} left")]
    InsufficientDice { needed: usize, remaining: usize },

    #[error("invalid die value {0} (expected 1..=6)")]
    InvalidDie(i64),

    #[error("unreadable dice file: {0}")]
    Parse(String),
}

/// Every way an engine operation can be rejected. A rejected operation
/// leaves the game state and the dice queue untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error(transparent)]
    Dice(#[from] DiceError),

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("game is over (winner {0})")]
    GameOver(PlayerId),
}

impl EngineError {
    pub(crate) fn illegal(msg: impl Into<String>) -> Self {
        EngineError::IllegalMove(msg.into())
    }

    pub(crate) fn not_owned(tid: TerritoryId, player: PlayerId) -> Self {
        EngineError::IllegalMove(format!("territory {tid} is not owned by player {player}"))
    }

    pub fn unknown_territory(raw: i64) -> Self {
        EngineError::InvalidReference(format!("no territory with id {raw}"))
    }
}
