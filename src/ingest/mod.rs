//! Document Ingestion
//!
//! Turns an uploaded image or PDF into a persisted session record.
//!
//! Flow:
//! 1. Take ownership of the upload in a scoped workspace
//! 2. Detect the format from the declared file name
//! 3. Rasterize PDFs into page images; images are a single page
//! 4. Recognize pages in order, aborting on the first failure
//! 5. Join page texts with a newline and append the record to the store
//! 6. Drop the workspace, deleting the upload and all page images

mod error;
mod format;
mod pipeline;
mod workspace;

pub use error::{IngestionError, IngestionErrorKind, InputError};
pub use format::{extension_of, DocumentFormat};
pub use pipeline::{IngestionPipeline, PAGE_SEPARATOR};
pub use workspace::IngestionWorkspace;
