//! Error types for the DocQA server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::chat::ChatError;
use crate::ingest::{IngestionError, InputError};
use crate::session::StoreError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Ingestion error: {0}")]
    Ingestion(#[from] IngestionError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
///
/// `details` is a short client-safe description; it never carries paths or
/// the underlying error chain.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, Option<String>) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone())),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone())),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred", None)
            }
            AppError::Ingestion(e) => ingestion_parts(e),
            AppError::Store(e) => {
                tracing::error!("Store error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Session storage failed", None)
            }
            AppError::Chat(e) => match e {
                ChatError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "Chat ID not found", None),
                ChatError::NotConfigured(_) => {
                    tracing::error!("Chat error: {}", e);
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Chat is not configured on this server",
                        None,
                    )
                }
                ChatError::Backend(_) => {
                    tracing::error!("Chat error: {}", e);
                    (StatusCode::BAD_GATEWAY, "Failed to generate AI response", None)
                }
            },
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error", None)
            }
        }
    }
}

fn ingestion_parts(e: &IngestionError) -> (StatusCode, &'static str, Option<String>) {
    const FAILED: &str = "Failed to extract text from the uploaded file";

    match e {
        IngestionError::Input(input) => {
            let details = match input {
                InputError::MissingUpload => "No file uploaded".to_string(),
                InputError::Unreadable(_) => "The uploaded file could not be read".to_string(),
                InputError::UnsupportedFormat(ext) if ext.is_empty() => {
                    "File has no extension; upload a PDF or an image".to_string()
                }
                InputError::UnsupportedFormat(ext) => {
                    format!("Unsupported file type '.{}'; upload a PDF or an image", ext)
                }
            };
            (StatusCode::BAD_REQUEST, "Invalid upload", Some(details))
        }
        IngestionError::EmptyDocument => (
            StatusCode::UNPROCESSABLE_ENTITY,
            FAILED,
            Some("The document has no pages".to_string()),
        ),
        IngestionError::RecognitionFailed { page, .. } => {
            tracing::warn!("Ingestion error: {}", e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                FAILED,
                Some(format!("Page {} could not be recognized", page)),
            )
        }
        IngestionError::Rasterization(_) => {
            tracing::warn!("Ingestion error: {}", e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                FAILED,
                Some("The PDF could not be split into pages".to_string()),
            )
        }
        IngestionError::Store(_) | IngestionError::Workspace(_) | IngestionError::Aborted(_) => {
            tracing::error!("Ingestion error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, FAILED, None)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = self.parts();

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
