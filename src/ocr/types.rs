//! OCR Types
//!
//! Defines types for recognizing text in page and photo images.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// OCR provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrProvider {
    /// Tesseract OCR (local CLI)
    Tesseract,
    /// Ollama vision model (local LLM)
    Ollama,
}

impl Default for OcrProvider {
    fn default() -> Self {
        Self::Tesseract
    }
}

impl FromStr for OcrProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tesseract" => Ok(Self::Tesseract),
            "ollama" => Ok(Self::Ollama),
            other => Err(format!("unknown OCR provider '{}'", other)),
        }
    }
}

/// OCR result for one image
#[derive(Debug, Clone, Serialize)]
pub struct OcrResult {
    /// Recognized text (may be empty for a blank page)
    pub text: String,
    /// Provider used
    pub provider: OcrProvider,
}

/// Non-streaming reply from Ollama's `/api/generate`
///
/// A 2xx reply can still carry `error` instead of `response` (for example
/// when the model is not loaded), so the text is only trusted when the
/// `response` field is actually present.
#[derive(Debug, Deserialize)]
pub struct OllamaGenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl OllamaGenerateResponse {
    /// Trimmed generated text, or a description of why there is none
    pub fn into_text(self) -> Result<String, String> {
        match (self.response, self.error) {
            (Some(text), _) => Ok(text.trim().to_string()),
            (None, Some(error)) => Err(format!("Ollama reported an error: {}", error)),
            (None, None) => Err("response field missing".to_string()),
        }
    }
}

/// Recognition error types
#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("OCR provider not available: {0}")]
    ProviderNotAvailable(String),

    #[error("Image could not be read: {0}")]
    UnreadableImage(String),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),

    #[error("API error: {0}")]
    ApiError(String),
}
