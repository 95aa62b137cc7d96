//! Ingestion Pipeline
//!
//! upload → format detection → (rasterize) → per-page OCR → join → persist
//!
//! Pages are recognized one after another inside a single ingestion; separate
//! ingestions run as separate tasks and never wait on each other except for
//! the short store append.

use std::path::PathBuf;
use std::sync::Arc;

use crate::ocr::TextRecognizer;
use crate::raster::{PageRasterizer, RasterPage, RasterizationError};
use crate::session::{SessionRecord, SessionStore};

use super::error::{IngestionError, InputError};
use super::format::DocumentFormat;
use super::workspace::IngestionWorkspace;

/// Separator placed between the text of consecutive pages
pub const PAGE_SEPARATOR: &str = "\n";

/// Document ingestion pipeline
#[derive(Clone)]
pub struct IngestionPipeline {
    inner: Arc<PipelineInner>,
}

struct PipelineInner {
    rasterizer: Arc<dyn PageRasterizer>,
    recognizer: Arc<dyn TextRecognizer>,
    store: SessionStore,
    /// Parent directory for per-ingestion work directories
    work_root: PathBuf,
}

impl IngestionPipeline {
    pub fn new(
        rasterizer: Arc<dyn PageRasterizer>,
        recognizer: Arc<dyn TextRecognizer>,
        store: SessionStore,
        work_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            inner: Arc::new(PipelineInner {
                rasterizer,
                recognizer,
                store,
                work_root: work_root.into(),
            }),
        }
    }

    /// The store records are appended to
    pub fn store(&self) -> &SessionStore {
        &self.inner.store
    }

    /// Ingest one uploaded file
    ///
    /// The upload and every intermediate page image are deleted before this
    /// returns, on success and on failure. Nothing is persisted unless every
    /// page was recognized.
    pub async fn ingest(
        &self,
        upload_path: PathBuf,
        declared_file_name: &str,
    ) -> Result<SessionRecord, IngestionError> {
        let work_root = self.inner.work_root.clone();
        let workspace = tokio::task::spawn_blocking(move || IngestionWorkspace::open(upload_path, &work_root))
            .await
            .map_err(|e| IngestionError::Aborted(e.to_string()))?
            .map_err(IngestionError::Workspace)?;

        let result = self.run(&workspace, declared_file_name).await;

        match &result {
            Ok(record) => tracing::info!(
                session_id = %record.session_id,
                file_name = %declared_file_name,
                chars = record.document_text.len(),
                "Document ingested"
            ),
            Err(e) => tracing::warn!(
                file_name = %declared_file_name,
                kind = ?e.kind(),
                error = %e,
                "Document ingestion failed"
            ),
        }

        drop(workspace);
        result
    }

    /// Run `ingest` as its own task
    ///
    /// Dropping the returned future (for example when an HTTP client
    /// disconnects) does not stop the ingestion, so its cleanup always runs
    /// to completion.
    pub async fn ingest_detached(
        &self,
        upload_path: PathBuf,
        declared_file_name: String,
    ) -> Result<SessionRecord, IngestionError> {
        let pipeline = self.clone();
        tokio::spawn(async move { pipeline.ingest(upload_path, &declared_file_name).await })
            .await
            .map_err(|e| IngestionError::Aborted(e.to_string()))?
    }

    async fn run(
        &self,
        workspace: &IngestionWorkspace,
        declared_file_name: &str,
    ) -> Result<SessionRecord, IngestionError> {
        check_upload(workspace).await?;

        let format = DocumentFormat::from_file_name(declared_file_name)?;
        let pages = self.pages_for(&format, workspace).await?;
        if pages.is_empty() {
            return Err(IngestionError::EmptyDocument);
        }
        ensure_page_order(&pages)?;

        tracing::debug!(
            file_name = %declared_file_name,
            pages = pages.len(),
            paginated = format.is_paginated(),
            "Recognizing pages"
        );

        let mut texts = Vec::with_capacity(pages.len());
        for page in &pages {
            let text = self
                .inner
                .recognizer
                .recognize(&page.path)
                .await
                .map_err(|source| IngestionError::RecognitionFailed {
                    page: page.index,
                    source,
                })?;

            tracing::debug!(page = page.index, chars = text.len(), "Page recognized");
            texts.push(text);
        }

        let record = SessionRecord::new(declared_file_name, texts.join(PAGE_SEPARATOR));
        self.inner.store.append(record.clone()).await?;

        Ok(record)
    }

    async fn pages_for(
        &self,
        format: &DocumentFormat,
        workspace: &IngestionWorkspace,
    ) -> Result<Vec<RasterPage>, IngestionError> {
        match format {
            DocumentFormat::Pdf => {
                let rasterizer = Arc::clone(&self.inner.rasterizer);
                let source = workspace.upload().to_path_buf();
                let out_dir = workspace.work_dir().to_path_buf();

                let pages = tokio::task::spawn_blocking(move || rasterizer.rasterize(&source, &out_dir))
                    .await
                    .map_err(|e| IngestionError::Aborted(e.to_string()))??;

                Ok(pages)
            }
            DocumentFormat::Image(_) => Ok(vec![RasterPage {
                index: 1,
                path: workspace.upload().to_path_buf(),
            }]),
        }
    }
}

async fn check_upload(workspace: &IngestionWorkspace) -> Result<(), InputError> {
    match tokio::fs::metadata(workspace.upload()).await {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(InputError::Unreadable("upload is not a regular file".to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(InputError::MissingUpload),
        Err(e) => Err(InputError::Unreadable(e.to_string())),
    }
}

/// Pages must be numbered `1..=N` in order
fn ensure_page_order(pages: &[RasterPage]) -> Result<(), RasterizationError> {
    for (position, page) in pages.iter().enumerate() {
        if page.index != position + 1 {
            return Err(RasterizationError::PageSequence(format!(
                "expected page {} but got page {}",
                position + 1,
                page.index
            )));
        }
    }
    Ok(())
}
