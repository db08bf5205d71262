pub mod agent;
pub mod allocation;
pub mod conquest;
pub mod driver;
pub mod planner;
pub mod random;

pub use agent::Agent;
pub use driver::{play_turn, run_ai_turns, DriveLimits, DriveReport, StopReason};
pub use planner::PathfinderAgent;
pub use random::RandomAgent;
