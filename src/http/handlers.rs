//! Request handlers for the MindCare API surface.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use super::error::ApiError;
use super::state::AppState;

/// Body of a supportive-chat request.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Body of a supportive-chat reply.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Supportive-chat endpoint.
///
/// Thin proxy to the configured completion upstream; the interesting part of
/// this route is the rate-limit middleware in front of it.
#[instrument(skip(state, request), fields(message_len = request.message.len()))]
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = request.message.trim();
    if message.is_empty() {
        warn!("Received chat request with empty message");
        return Err(ApiError::invalid_request("message is required"));
    }

    let reply = state.chat.generate_reply(message).await;
    info!(reply_len = reply.len(), "Chat reply generated");

    Ok(Json(ChatResponse { reply }))
}

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Diagnostic report: upstream availability and server time.
pub async fn health_details(State(state): State<AppState>) -> Json<Value> {
    let upstream = if state.chat.is_configured() {
        "configured"
    } else {
        "not-configured"
    };

    Json(json!({
        "status": "ok",
        "upstream": upstream,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
