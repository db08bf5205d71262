pub mod types;
pub mod map;
pub mod error;
pub mod dice;
pub mod combat;
pub mod log;
pub mod reinforcement;
pub mod navigation;
pub mod setup;
pub mod engine;

mod tests;

pub use types::*;
pub use error::{DiceError, EngineError};
pub use dice::DiceQueue;
pub use engine::{apply_action, force_next_turn, pending, Action, ActionOutcome, AttackReport};
pub use log::{MoveLog, MoveRecord};
pub use setup::{load_scenario, Scenario};
