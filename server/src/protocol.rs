// ═══════════════════════════════════════════════════════════════════════
// Call expressions — `frisk.api_attack(23, 24, 4)` into a typed Request.
//
// Grammar: optional `frisk.` prefix, operation name (with or without the
// `api_` prefix), then a parenthesised list of JSON literals. The argument
// list is read as a JSON array; nothing is evaluated.
// ═══════════════════════════════════════════════════════════════════════

use frisk_engine::setup::Scenario;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Not a call expression at all.
    #[error("malformed call: {0}")]
    Malformed(String),

    #[error("unknown operation {0:?}")]
    UnknownOperation(String),

    /// Right operation, wrong number or type of arguments.
    #[error("{op}: {reason}")]
    BadArguments { op: &'static str, reason: String },

    /// `load_game` argument that is not a scenario object.
    #[error("{0}")]
    InvalidScenario(String),
}

/// A parsed but not yet interpreted call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Operation name without prefixes (`attack`).
    pub op: String,
    pub args: Vec<Value>,
}

pub fn parse_call(text: &str) -> Result<Call, ProtocolError> {
    let malformed = |why: &str| ProtocolError::Malformed(format!("{why} in {:?}", abbreviate(text)));

    let body = text.trim().trim_end_matches(';').trim_end();
    let body = body.strip_prefix("frisk.").unwrap_or(body);
    let open = body.find('(').ok_or_else(|| malformed("missing '('"))?;
    if !body.ends_with(')') {
        return Err(malformed("missing ')'"));
    }

    let name = body[..open].trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(malformed("bad operation name"));
    }
    let op = name.strip_prefix("api_").unwrap_or(name).to_string();

    let inner = body[open + 1..body.len() - 1].trim();
    let args = if inner.is_empty() {
        Vec::new()
    } else {
        match serde_json::from_str::<Value>(&format!("[{inner}]")) {
            Ok(Value::Array(args)) => args,
            Ok(_) | Err(_) => return Err(malformed("arguments are not JSON literals")),
        }
    };
    Ok(Call { op, args })
}

fn abbreviate(text: &str) -> String {
    const MAX: usize = 80;
    match text.char_indices().nth(MAX) {
        Some((i, _)) => format!("{}...", &text[..i]),
        None => text.to_string(),
    }
}

// ── Requests ───────────────────────────────────────────────────────────

/// Every operation of the control API. Territory ids and counts stay raw
/// integers here; range checks belong to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    LoadGame(Box<Scenario>),
    ResetDiceRollArray,
    PushDiceRolls(Vec<i64>),
    GetDiceLeft,
    ResetToStandardDice,
    Reinforce { tid: i64, count: i64 },
    Attack { from: i64, to: i64, armies: i64 },
    PostAttackMove { from: i64, to: i64, count: i64 },
    EndAttack,
    Fortify { from: i64, to: i64, count: i64 },
    EndTurn,
    SetNextTurn,
    GetTerritories,
    GetPlayers,
    GetTurnInfo,
    GetNumberOfAlivePlayers,
    TurnOnLogApiCalls,
    TurnOffLogApiCalls,
    ResetLogApiCalls,
    GetLogApiCalls,
}

impl Request {
    pub fn from_call(call: &Call) -> Result<Request, ProtocolError> {
        let args = Args { op: "", values: &call.args };
        let req = match call.op.as_str() {
            "load_game" => {
                let args = args.named("load_game").exactly(1)?;
                let scenario = Scenario::from_value(args.values[0].clone())
                    .map_err(|e| ProtocolError::InvalidScenario(e.to_string()))?;
                Request::LoadGame(Box::new(scenario))
            }
            "reset_dice_roll_array" => args.named("reset_dice_roll_array").none(Request::ResetDiceRollArray)?,
            "push_dice_rolls" => Request::PushDiceRolls(args.named("push_dice_rolls").int_list()?),
            "get_dice_left" => args.named("get_dice_left").none(Request::GetDiceLeft)?,
            "reset_to_standard_dice" => args.named("reset_to_standard_dice").none(Request::ResetToStandardDice)?,
            "reinforce" => {
                let [tid, count] = args.named("reinforce").ints()?;
                Request::Reinforce { tid, count }
            }
            "attack" => {
                let [from, to, armies] = args.named("attack").ints()?;
                Request::Attack { from, to, armies }
            }
            "post_attack_move" => {
                let [from, to, count] = args.named("post_attack_move").ints()?;
                Request::PostAttackMove { from, to, count }
            }
            "end_attack" => args.named("end_attack").none(Request::EndAttack)?,
            "fortify" => {
                let [from, to, count] = args.named("fortify").ints()?;
                Request::Fortify { from, to, count }
            }
            "end_turn" => args.named("end_turn").none(Request::EndTurn)?,
            "set_next_turn" => args.named("set_next_turn").none(Request::SetNextTurn)?,
            "get_territories" => args.named("get_territories").none(Request::GetTerritories)?,
            "get_players" => args.named("get_players").none(Request::GetPlayers)?,
            "get_turn_info" => args.named("get_turn_info").none(Request::GetTurnInfo)?,
            "get_number_of_alive_players" => {
                args.named("get_number_of_alive_players").none(Request::GetNumberOfAlivePlayers)?
            }
            "turn_on_log_api_calls" => args.named("turn_on_log_api_calls").none(Request::TurnOnLogApiCalls)?,
            "turn_off_log_api_calls" => args.named("turn_off_log_api_calls").none(Request::TurnOffLogApiCalls)?,
            "reset_log_api_calls" => args.named("reset_log_api_calls").none(Request::ResetLogApiCalls)?,
            "get_log_api_calls" => args.named("get_log_api_calls").none(Request::GetLogApiCalls)?,
            other => return Err(ProtocolError::UnknownOperation(other.to_string())),
        };
        Ok(req)
    }

    pub fn parse(text: &str) -> Result<Request, ProtocolError> {
        Request::from_call(&parse_call(text)?)
    }

    /// Operations that only read state.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Request::GetDiceLeft
                | Request::GetTerritories
                | Request::GetPlayers
                | Request::GetTurnInfo
                | Request::GetNumberOfAlivePlayers
                | Request::GetLogApiCalls
        )
    }
}

// ── Argument checks ────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Args<'a> {
    op: &'static str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    fn named(self, op: &'static str) -> Args<'a> {
        Args { op, ..self }
    }

    fn bad(&self, reason: impl Into<String>) -> ProtocolError {
        ProtocolError::BadArguments { op: self.op, reason: reason.into() }
    }

    fn exactly(self, n: usize) -> Result<Args<'a>, ProtocolError> {
        if self.values.len() != n {
            return Err(self.bad(format!("expected {n} argument(s), got {}", self.values.len())));
        }
        Ok(self)
    }

    fn none(self, req: Request) -> Result<Request, ProtocolError> {
        self.exactly(0)?;
        Ok(req)
    }

    fn int(&self, v: &Value) -> Result<i64, ProtocolError> {
        v.as_i64().ok_or_else(|| self.bad(format!("expected an integer, got {v}")))
    }

    fn ints<const N: usize>(self) -> Result<[i64; N], ProtocolError> {
        self.exactly(N)?;
        let mut out = [0; N];
        for (slot, v) in out.iter_mut().zip(self.values) {
            *slot = self.int(v)?;
        }
        Ok(out)
    }

    /// Varargs integers, or a single array of them.
    fn int_list(self) -> Result<Vec<i64>, ProtocolError> {
        let items = match self.values {
            [Value::Array(items)] => items.as_slice(),
            values => values,
        };
        items.iter().map(|v| self.int(v)).collect()
    }
}
