// ═══════════════════════════════════════════════════════════════════════
// HTTP routing — call expressions in the request body, JSON out.
// ═══════════════════════════════════════════════════════════════════════

use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::task::JoinError;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::session::{GameStore, Reply};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<GameStore>>,
}

impl AppState {
    pub fn new(store: GameStore) -> Self {
        AppState { store: Arc::new(Mutex::new(store)) }
    }

    /// Run `f` against the store on the blocking pool. A `set_next_turn`
    /// can play many computer turns while holding the lock.
    pub async fn with_store<T, F>(&self, f: F) -> Result<T, JoinError>
    where
        F: FnOnce(&mut GameStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            // a call that panicked must not take the other games down with it
            let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard)
        })
        .await
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Empty => StatusCode::OK.into_response(),
            Reply::Json(value) => Json(value).into_response(),
            Reply::Text(text) => ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/server_game", post(default_game_call))
        .route("/games/{game_id}/call", post(named_game_call))
        .route("/log", get(move_log))
        .with_state(state)
}

/// Bind `config.bind` and serve until the process is stopped.
pub async fn serve(config: &ServerConfig) -> std::io::Result<()> {
    let store = GameStore::new(config).map_err(std::io::Error::other)?;
    let app = build_router(AppState::new(store));
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!(bind = %config.bind, "frisk server listening");
    axum::serve(listener, app).await
}

fn respond(outcome: Result<Result<Reply, ApiError>, JoinError>) -> Response {
    match outcome {
        Ok(Ok(reply)) => reply.into_response(),
        Ok(Err(err)) => err.into_response(),
        Err(join) => {
            error!(error = %join, "call worker failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true, "service": "frisk"}))
}

async fn default_game_call(State(state): State<AppState>, body: String) -> Response {
    respond(state.with_store(move |store| store.call(None, &body)).await)
}

async fn named_game_call(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    body: String,
) -> Response {
    respond(state.with_store(move |store| store.call(Some(&game_id), &body)).await)
}

/// The default game's move log, one call per line.
async fn move_log(State(state): State<AppState>) -> Response {
    let text = state
        .with_store(|store| store.default_game().state().map(|s| s.log.call_text()).unwrap_or_default())
        .await;
    respond(text.map(|t| Ok(Reply::Text(t))))
}
