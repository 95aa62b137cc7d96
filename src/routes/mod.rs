//! Route modules for DocQA Server

pub mod chat;
pub mod health;
pub mod ocr;
pub mod sessions;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router with all layers applied
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.config().server.client_url.as_deref());
    let body_limit = DefaultBodyLimit::max(state.config().server.max_upload_bytes);

    Router::new()
        .merge(health::router())
        .nest("/api/health", health::router())
        .nest("/api/ocr", ocr::router())
        .nest("/api/chat", chat::router())
        .nest("/api/sessions", sessions::router())
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(client_url: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match client_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(e)) => {
            tracing::warn!("Invalid CLIENT_URL, allowing any origin: {}", e);
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}
