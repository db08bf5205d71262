use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use frisk_engine::{DiceError, EngineError};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::protocol::ProtocolError;

/// Numeric error codes of the control API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum ErrorCode {
    Malformed = 1,
    BadCall = 2,
    IllegalMove = 3,
    InvalidReference = 4,
    DiceExhausted = 5,
    UnknownOperation = 6,
    InvalidScenario = 7,
}

impl From<ErrorCode> for u8 {
    fn from(code: ErrorCode) -> u8 {
        code as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            ErrorKind::Protocol(ProtocolError::Malformed(_)) => ErrorCode::Malformed,
            ErrorKind::Protocol(ProtocolError::BadArguments { .. }) => ErrorCode::BadCall,
            ErrorKind::Protocol(ProtocolError::UnknownOperation(_)) => ErrorCode::UnknownOperation,
            ErrorKind::Protocol(ProtocolError::InvalidScenario(_)) => ErrorCode::InvalidScenario,
            ErrorKind::Engine(EngineError::IllegalMove(_) | EngineError::GameOver(_)) => ErrorCode::IllegalMove,
            ErrorKind::Engine(EngineError::InvalidReference(_)) => ErrorCode::InvalidReference,
            ErrorKind::Engine(EngineError::InvalidScenario(_)) => ErrorCode::InvalidScenario,
            ErrorKind::Engine(EngineError::Dice(DiceError::InvalidDie(_) | DiceError::Parse(_))) => ErrorCode::BadCall,
            ErrorKind::Engine(EngineError::Dice(_)) => ErrorCode::DiceExhausted,
        }
    }
}

/// A failed call: what went wrong plus the call text that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub call: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} raised error {}: {}", self.call, self.code() as u8, self.kind)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: ErrorCode,
    message: String,
    call: &'a str,
}

impl ApiError {
    pub fn new(kind: impl Into<ErrorKind>, call: &str) -> Self {
        ApiError { kind: kind.into(), call: call.trim().to_string() }
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    pub fn status(&self) -> StatusCode {
        match self.code() {
            ErrorCode::Malformed => StatusCode::BAD_REQUEST,
            _ => StatusCode::OK,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        warn!(code = code as u8, call = %self.call, error = %self.kind, "call failed");
        let body = ErrorBody { error: code, message: self.to_string(), call: &self.call };
        (self.status(), Json(body)).into_response()
    }
}
