use std::path::PathBuf;

use frisk_agents::driver::{DEFAULT_MAX_TURNS, DEFAULT_STEP_LIMIT};
use frisk_agents::DriveLimits;
use frisk_engine::dice::{generate_standard, parse_dice_file, STANDARD_DICE_LEN};
use frisk_engine::DiceError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BIND: &str = "127.0.0.1:8888";
pub const DEFAULT_DICE_SEED: u64 = 1;

/// Server settings. Every field has a default so partial JSON works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Standard dice seed file; generated from `dice_seed` when absent.
    pub dice_file: Option<PathBuf>,
    pub dice_seed: u64,
    /// Top the dice up from the standard seed while computer players move.
    pub auto_replenish: bool,
    pub ai_step_limit: usize,
    pub max_ai_turns: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: DEFAULT_BIND.to_string(),
            dice_file: None,
            dice_seed: DEFAULT_DICE_SEED,
            auto_replenish: true,
            ai_step_limit: DEFAULT_STEP_LIMIT,
            max_ai_turns: DEFAULT_MAX_TURNS,
        }
    }
}

impl ServerConfig {
    pub fn limits(&self) -> DriveLimits {
        DriveLimits {
            step_limit: self.ai_step_limit,
            max_turns: self.max_ai_turns,
            replenish: self.auto_replenish,
        }
    }

    /// The standard dice seed: the dice file if configured, else generated.
    pub fn standard_dice(&self) -> Result<Vec<i64>, DiceError> {
        match &self.dice_file {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| DiceError::Parse(format!("{}: {e}", path.display())))?;
                parse_dice_file(&text)
            }
            None => Ok(generate_standard(self.dice_seed, STANDARD_DICE_LEN)),
        }
    }
}
