//! Ingestion error types

use thiserror::Error;

use crate::ocr::RecognitionError;
use crate::raster::RasterizationError;
use crate::session::StoreError;

/// Problems with the upload itself
#[derive(Debug, Error)]
pub enum InputError {
    #[error("No file uploaded")]
    MissingUpload,

    #[error("Upload could not be read: {0}")]
    Unreadable(String),

    #[error("Unsupported file type: '{0}'")]
    UnsupportedFormat(String),
}

/// Failure of one `ingest` call
///
/// A failed ingestion never persists anything.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Rasterization failed: {0}")]
    Rasterization(#[source] RasterizationError),

    #[error("Document has no pages")]
    EmptyDocument,

    #[error("Recognition failed on page {page}: {source}")]
    RecognitionFailed {
        page: usize,
        #[source]
        source: RecognitionError,
    },

    #[error("Failed to persist session: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to prepare work directory: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("Ingestion task aborted: {0}")]
    Aborted(String),
}

/// Coarse classification of an ingestion failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionErrorKind {
    Input,
    Rasterization,
    EmptyDocument,
    RecognitionFailed,
    Store,
    Workspace,
    Aborted,
}

impl IngestionError {
    pub fn kind(&self) -> IngestionErrorKind {
        match self {
            Self::Input(_) => IngestionErrorKind::Input,
            Self::Rasterization(_) => IngestionErrorKind::Rasterization,
            Self::EmptyDocument => IngestionErrorKind::EmptyDocument,
            Self::RecognitionFailed { .. } => IngestionErrorKind::RecognitionFailed,
            Self::Store(_) => IngestionErrorKind::Store,
            Self::Workspace(_) => IngestionErrorKind::Workspace,
            Self::Aborted(_) => IngestionErrorKind::Aborted,
        }
    }

    /// Page that failed recognition, if any
    pub fn failed_page(&self) -> Option<usize> {
        match self {
            Self::RecognitionFailed { page, .. } => Some(*page),
            _ => None,
        }
    }
}

impl From<RasterizationError> for IngestionError {
    fn from(err: RasterizationError) -> Self {
        match err {
            RasterizationError::NoPages => IngestionError::EmptyDocument,
            other => IngestionError::Rasterization(other),
        }
    }
}
