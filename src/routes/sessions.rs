//! Session lookup route
//!
//! GET /api/sessions/:session_id - stored record for a session.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::session::{SessionId, SessionLookup, SessionRecord};
use crate::state::AppState;

/// Create the sessions router
pub fn router() -> Router<AppState> {
    Router::new().route("/:session_id", get(get_session))
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionRecord>> {
    state
        .resolver()
        .resolve(&SessionId::from(session_id))
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))
}
