//! OCR upload route
//!
//! POST /api/ocr - multipart upload (field `file`) of a PDF or image.
//! Responds with the new session id and the extracted text.

use std::path::{Path, PathBuf};

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::ingest::{extension_of, IngestionError, InputError};
use crate::state::AppState;

/// Multipart field carrying the document
const FILE_FIELD: &str = "file";

/// Create the OCR router
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(extract_text))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    pub session_id: String,
    pub text: String,
}

/// POST /api/ocr
///
/// The ingestion runs as its own task, so a client that disconnects
/// mid-request cannot interrupt recognition or leave temp files behind.
async fn extract_text(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<OcrResponse>> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let upload = receive_upload(&mut multipart, &state.config().storage.upload_dir)
        .await?
        .ok_or(AppError::Ingestion(IngestionError::Input(InputError::MissingUpload)))?;

    tracing::info!(file_name = %upload.file_name, "Received upload");

    let (path, file_name) = upload.into_parts();
    let record = state.pipeline().ingest_detached(path, file_name).await?;

    Ok(Json(OcrResponse {
        session_id: record.session_id.to_string(),
        text: record.document_text,
    }))
}

/// Uploaded file on disk, removed on drop unless handed off
struct ReceivedUpload {
    path: PathBuf,
    file_name: String,
    armed: bool,
}

impl ReceivedUpload {
    fn new(path: PathBuf, file_name: String) -> Self {
        Self {
            path,
            file_name,
            armed: true,
        }
    }

    /// Hand the file over to the pipeline, which now owns its cleanup
    fn into_parts(mut self) -> (PathBuf, String) {
        self.armed = false;
        (std::mem::take(&mut self.path), std::mem::take(&mut self.file_name))
    }
}

impl Drop for ReceivedUpload {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove partial upload");
            }
        }
    }
}

/// Stream the `file` field to `upload_dir`
///
/// Returns `None` when the form has no `file` field.
async fn receive_upload(multipart: &mut Multipart, upload_dir: &Path) -> Result<Option<ReceivedUpload>> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let stored_name = match extension_of(&file_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        tokio::fs::create_dir_all(upload_dir).await?;
        let target = upload_dir.join(stored_name);
        let upload = ReceivedUpload::new(target.clone(), file_name);

        let mut file = tokio::fs::File::create(&target).await?;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        return Ok(Some(upload));
    }

    Ok(None)
}
