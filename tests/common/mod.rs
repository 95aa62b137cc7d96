//! Shared test doubles for pipeline and route tests
//!
//! The fake "PDF" format is plain text with pages separated by a form feed
//! (`\x0c`). The fake rasterizer writes each page's text into its page image
//! and the fake recognizer reads that text back, so tests control exactly
//! what every page recognizes as.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use docqa_server::ingest::IngestionPipeline;
use docqa_server::ocr::{RecognitionError, TextRecognizer};
use docqa_server::raster::{
    collect_pages, page_file_name, PageRasterizer, RasterPage, RasterizationError, PAGE_PREFIX,
};
use docqa_server::session::SessionStore;

/// Page text that makes the recognizer fail
pub const UNREADABLE: &str = "UNREADABLE";

/// Page text that makes the recognizer panic
pub const PANIC: &str = "PANIC";

pub struct FormFeedRasterizer;

impl PageRasterizer for FormFeedRasterizer {
    fn rasterize(&self, source: &Path, out_dir: &Path) -> Result<Vec<RasterPage>, RasterizationError> {
        let content = std::fs::read_to_string(source)
            .map_err(|e| RasterizationError::Open(e.to_string()))?;

        if !content.is_empty() {
            for (i, page) in content.split('\x0c').enumerate() {
                std::fs::write(out_dir.join(page_file_name(PAGE_PREFIX, i + 1)), page)?;
            }
        }

        collect_pages(out_dir, PAGE_PREFIX)
    }
}

/// Recognizer that returns the image file's contents as its text
pub struct ContentRecognizer {
    /// Optional rendezvous every recognition must pass through
    pub barrier: Option<Arc<tokio::sync::Barrier>>,
}

#[async_trait]
impl TextRecognizer for ContentRecognizer {
    async fn recognize(&self, image: &Path) -> Result<String, RecognitionError> {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }

        let text = tokio::fs::read_to_string(image)
            .await
            .map_err(|e| RecognitionError::UnreadableImage(e.to_string()))?;

        match text.as_str() {
            UNREADABLE => Err(RecognitionError::UnreadableImage("corrupt image data".into())),
            PANIC => panic!("recognizer exploded"),
            _ => Ok(text),
        }
    }
}

/// Temp directories and a pipeline wired to the test doubles
pub struct Harness {
    pub root: TempDir,
    pub pipeline: IngestionPipeline,
    pub store: SessionStore,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_recognizer(ContentRecognizer { barrier: None })
    }

    pub fn with_recognizer(recognizer: ContentRecognizer) -> Self {
        let root = TempDir::new().unwrap();
        let store = SessionStore::new(root.path().join("data").join("extracted_data.json"));
        let pipeline = IngestionPipeline::new(
            Arc::new(FormFeedRasterizer),
            Arc::new(recognizer),
            store.clone(),
            root.path().join("work"),
        );

        Self { root, pipeline, store }
    }

    pub fn uploads(&self) -> PathBuf {
        let dir = self.root.path().join("uploads");
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub fn work_root(&self) -> PathBuf {
        self.root.path().join("work")
    }

    /// Write an upload file and return its path
    pub fn upload(&self, name: &str, content: &str) -> PathBuf {
        let path = self.uploads().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Files left in the upload and work directories
    pub fn leftover_files(&self) -> Vec<PathBuf> {
        let mut left = Vec::new();
        for dir in [self.uploads(), self.work_root()] {
            if dir.exists() {
                collect_files(&dir, &mut left);
            }
        }
        left
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            out.push(path.clone());
            collect_files(&path, out);
        } else {
            out.push(path);
        }
    }
}
