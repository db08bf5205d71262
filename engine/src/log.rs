// ═══════════════════════════════════════════════════════════════════════
// Move log — typed record of every successful mutating operation.
// Rendered to call text (`api_reinforce(34,14)`) for external drivers.
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};

use crate::types::{PlayerId, TerritoryId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MoveRecord {
    Reinforce { tid: TerritoryId, count: u32 },
    Attack { from: TerritoryId, to: TerritoryId, armies: u32 },
    PostAttackMove { from: TerritoryId, to: TerritoryId, count: u32 },
    EndAttack,
    Fortify { from: TerritoryId, to: TerritoryId, count: u32 },
    EndTurn,
    /// Turn ended from outside (`set_next_turn`).
    NextTurn,
}

impl MoveRecord {
    pub fn call_text(&self) -> String {
        match self {
            MoveRecord::Reinforce { tid, count } => format!("api_reinforce({tid},{count})"),
            MoveRecord::Attack { from, to, armies } => format!("api_attack({from},{to},{armies})"),
            MoveRecord::PostAttackMove { from, to, count } => {
                format!("api_post_attack_move({from},{to},{count})")
            }
            MoveRecord::EndAttack => "api_end_attack()".to_string(),
            MoveRecord::Fortify { from, to, count } => format!("api_fortify({from},{to},{count})"),
            MoveRecord::EndTurn => "api_end_turn()".to_string(),
            MoveRecord::NextTurn => "api_set_next_turn()".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub player: PlayerId,
    pub record: MoveRecord,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveLog {
    enabled: bool,
    entries: Vec<LogEntry>,
}

impl MoveLog {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn turn_on(&mut self) {
        self.enabled = true;
    }

    pub fn turn_off(&mut self) {
        self.enabled = false;
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// No-op while logging is off.
    pub fn record(&mut self, player: PlayerId, record: MoveRecord) {
        if self.enabled {
            self.entries.push(LogEntry { player, record });
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn call_lines(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.record.call_text()).collect()
    }

    /// All call lines joined by newlines, the form drivers grep with regexes.
    pub fn call_text(&self) -> String {
        self.call_lines().join("\n")
    }
}
