//! OCR Module
//!
//! Text recognition for uploaded images and rasterized PDF pages.
//!
//! Supports multiple backends:
//! - Tesseract (local, requires the `tesseract` binary)
//! - Ollama vision models (local LLM)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use docqa_server::ocr::{OcrService, OcrServiceConfig, TextRecognizer};
//!
//! let service = OcrService::new(&OcrServiceConfig::default());
//! let text = service.recognize(Path::new("page-1.png")).await?;
//! ```

mod provider;
mod service;
mod types;

pub use provider::{OcrProviderTrait, OllamaProvider, TesseractProvider, TextRecognizer};
pub use service::{OcrService, OcrServiceConfig};
pub use types::{OcrProvider, OcrResult, OllamaGenerateResponse, RecognitionError};
