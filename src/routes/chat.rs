//! Chat route
//!
//! POST /api/chat - ask a question about an ingested document.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};

use crate::chat::{ChatRequest, ChatResponse};
use crate::error::{AppError, Result};
use crate::session::SessionId;
use crate::state::AppState;

/// Create the chat router
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(chat))
}

/// POST /api/chat
async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let session_id = request.session_id.filter(|id| !id.trim().is_empty());
    let question = request.question.filter(|q| !q.trim().is_empty());
    let (Some(session_id), Some(question)) = (session_id, question) else {
        return Err(AppError::BadRequest("Missing sessionId or question".to_string()));
    };

    let response = state
        .chat()
        .ask(&SessionId::from(session_id), &question)
        .await?;

    Ok(Json(ChatResponse { response }))
}
