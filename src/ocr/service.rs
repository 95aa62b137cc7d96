//! OCR Service
//!
//! Picks a configured OCR provider and exposes it as a `TextRecognizer`.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;

use super::{
    provider::{OcrProviderTrait, OllamaProvider, TesseractProvider, TextRecognizer},
    types::{OcrProvider, RecognitionError},
};

/// OCR service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OcrServiceConfig {
    /// Preferred provider
    pub provider: OcrProvider,
    /// Tesseract binary name or path
    pub tesseract_bin: String,
    /// Ollama base URL
    pub ollama_url: String,
    /// Ollama vision model name
    pub ollama_model: String,
    /// OCR language (tesseract language code)
    pub language: String,
}

impl Default for OcrServiceConfig {
    fn default() -> Self {
        Self {
            provider: OcrProvider::Tesseract,
            tesseract_bin: "tesseract".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llava".to_string(),
            language: "eng".to_string(),
        }
    }
}

/// OCR service
///
/// Uses the preferred provider when it is available and otherwise the first
/// available one. A recognition failure is returned as is; the service never
/// retries a page on a second engine.
///
/// The choice is made once and then kept, so every page of a document goes
/// through the same engine. It is only dropped when that engine reports
/// itself unavailable.
pub struct OcrService {
    preferred: OcrProvider,
    providers: Vec<Arc<dyn OcrProviderTrait>>,
    selected: Mutex<Option<Arc<dyn OcrProviderTrait>>>,
}

impl OcrService {
    /// Create a new OCR service
    pub fn new(config: &OcrServiceConfig) -> Self {
        let providers: Vec<Arc<dyn OcrProviderTrait>> = vec![
            Arc::new(TesseractProvider::new(&config.tesseract_bin, &config.language)),
            Arc::new(OllamaProvider::new(
                &config.ollama_url,
                &config.ollama_model,
                &config.language,
            )),
        ];

        Self::with_providers(config.provider, providers)
    }

    /// Create a service over an explicit provider list
    pub fn with_providers(preferred: OcrProvider, providers: Vec<Arc<dyn OcrProviderTrait>>) -> Self {
        Self {
            preferred,
            providers,
            selected: Mutex::new(None),
        }
    }

    /// Get available providers
    pub async fn available_providers(&self) -> Vec<OcrProvider> {
        let mut available = Vec::new();
        for provider in &self.providers {
            if provider.is_available().await {
                available.push(provider.provider_type());
            }
        }
        available
    }

    async fn select_provider(&self) -> Result<Arc<dyn OcrProviderTrait>, RecognitionError> {
        let cached = self.selected.lock().clone();
        if let Some(provider) = cached {
            return Ok(provider);
        }

        let provider = self.detect_provider().await?;
        *self.selected.lock() = Some(Arc::clone(&provider));
        Ok(provider)
    }

    async fn detect_provider(&self) -> Result<Arc<dyn OcrProviderTrait>, RecognitionError> {
        let ordered = self
            .providers
            .iter()
            .filter(|p| p.provider_type() == self.preferred)
            .chain(self.providers.iter().filter(|p| p.provider_type() != self.preferred));

        for provider in ordered {
            if provider.is_available().await {
                if provider.provider_type() != self.preferred {
                    tracing::warn!(
                        preferred = ?self.preferred,
                        using = ?provider.provider_type(),
                        "Preferred OCR provider unavailable, using fallback"
                    );
                }
                return Ok(Arc::clone(provider));
            }
        }

        Err(RecognitionError::ProviderNotAvailable(
            "No OCR providers available".to_string(),
        ))
    }
}

#[async_trait]
impl TextRecognizer for OcrService {
    async fn recognize(&self, image: &Path) -> Result<String, RecognitionError> {
        let provider = self.select_provider().await?;
        let result = match provider.recognize_file(image).await {
            Ok(result) => result,
            Err(e @ RecognitionError::ProviderNotAvailable(_)) => {
                // Pick again on the next document
                *self.selected.lock() = None;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        tracing::debug!(
            provider = ?result.provider,
            chars = result.text.len(),
            "Recognized image"
        );

        Ok(result.text)
    }
}
