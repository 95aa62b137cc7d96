//! Page Rasterizer
//!
//! Splits a paginated document (PDF) into one PNG per page so each page can
//! be handed to the text recognizer on its own.
//!
//! Page images are written as `page-<n>.png` where `n` is the 1-based page
//! index. The index is recovered from the file name when the output
//! directory is collected, and the sequence must be contiguous.

mod pages;
mod renderer;

use std::path::{Path, PathBuf};

pub use pages::{collect_pages, page_file_name, PAGE_PREFIX};
pub use renderer::MupdfRasterizer;

/// One rendered page of a paginated document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterPage {
    /// Page number (1-indexed, matches source order)
    pub index: usize,
    /// Path to the single-page image
    pub path: PathBuf,
}

/// Rasterizer trait
///
/// Implementations are blocking; callers run them on the blocking pool.
pub trait PageRasterizer: Send + Sync {
    /// Render every page of `source` into `out_dir`, ascending by page index.
    ///
    /// The source file is never deleted.
    fn rasterize(&self, source: &Path, out_dir: &Path) -> Result<Vec<RasterPage>, RasterizationError>;
}

/// Rasterization error types
#[derive(Debug, thiserror::Error)]
pub enum RasterizationError {
    #[error("Document could not be opened as PDF: {0}")]
    Open(String),

    #[error("Failed to render page {page}: {message}")]
    Render { page: usize, message: String },

    #[error("Document produced no pages")]
    NoPages,

    #[error("Invalid page sequence: {0}")]
    PageSequence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<mupdf::Error> for RasterizationError {
    fn from(err: mupdf::Error) -> Self {
        RasterizationError::Open(err.to_string())
    }
}
