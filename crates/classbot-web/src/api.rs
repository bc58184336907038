//! JSON API route handlers.
//!
//! Provides the chat-widget lookup endpoint and a status endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /api/get_answer
// ---------------------------------------------------------------------------

/// Request body for the lookup endpoint. Absent fields count as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AskBody {
    pub query: String,
    pub subject: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Answer a question from the corpus. Always responds 200; a miss carries
/// the not-found sentinel as its answer.
pub async fn get_answer(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AskBody>,
) -> Json<AskResponse> {
    let answer = state.service.ask(&body.query, &body.subject).await;
    Json(AskResponse { answer })
}

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Response payload for the `/api/status` endpoint.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub questions: usize,
    pub accounts: usize,
    pub active_sessions: u64,
    pub uptime_seconds: u64,
}

/// Return basic service status.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let service = &state.service;
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        questions: service.corpus().len().await,
        accounts: service.accounts().len().await,
        active_sessions: service.sessions().active_sessions().await,
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}
