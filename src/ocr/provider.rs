//! OCR Providers
//!
//! Defines the recognition traits and the backends that implement them.

use std::path::Path;

use async_trait::async_trait;

use super::types::{OcrProvider, OcrResult, OllamaGenerateResponse, RecognitionError};

/// Text recognition capability
///
/// The single seam between the ingestion pipeline and any OCR engine:
/// given one image file, return its text. An empty string is a valid
/// result for a blank page.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &Path) -> Result<String, RecognitionError>;
}

/// OCR provider trait
#[async_trait]
pub trait OcrProviderTrait: Send + Sync {
    /// Get the provider type
    fn provider_type(&self) -> OcrProvider;

    /// Check if the provider is available
    async fn is_available(&self) -> bool;

    /// Perform OCR on an image file
    async fn recognize_file(&self, image: &Path) -> Result<OcrResult, RecognitionError>;
}

async fn read_image(image: &Path) -> Result<Vec<u8>, RecognitionError> {
    let data = tokio::fs::read(image)
        .await
        .map_err(|e| RecognitionError::UnreadableImage(e.to_string()))?;

    if data.is_empty() {
        return Err(RecognitionError::UnreadableImage("image file is empty".to_string()));
    }

    Ok(data)
}

/// Tesseract OCR provider
///
/// Shells out to the `tesseract` binary and reads the text from stdout.
pub struct TesseractProvider {
    /// Path or name of the tesseract binary
    binary: String,
    /// Default language
    language: String,
}

impl TesseractProvider {
    pub fn new(binary: &str, language: &str) -> Self {
        Self {
            binary: binary.to_string(),
            language: language.to_string(),
        }
    }
}

#[async_trait]
impl OcrProviderTrait for TesseractProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Tesseract
    }

    async fn is_available(&self) -> bool {
        tokio::process::Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    async fn recognize_file(&self, image: &Path) -> Result<OcrResult, RecognitionError> {
        // Fail fast on missing or empty input before spawning the engine
        read_image(image).await?;

        let output = tokio::process::Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--oem")
            .arg("3")
            .arg("--psm")
            .arg("3")
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RecognitionError::ProviderNotAvailable(format!(
                        "tesseract binary '{}' not found",
                        self.binary
                    ))
                } else {
                    RecognitionError::ProcessingError(format!("Failed to run tesseract: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::ProcessingError(format!(
                "Tesseract failed: {}",
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);

        Ok(OcrResult {
            text: text.trim().to_string(),
            provider: OcrProvider::Tesseract,
        })
    }
}

/// Ollama vision model provider
pub struct OllamaProvider {
    client: reqwest::Client,
    /// Ollama API URL
    base_url: String,
    /// Model name (e.g., "llava", "bakllava")
    model: String,
    /// Language hint passed in the prompt
    language: String,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str, language: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            language: language.to_string(),
        }
    }
}

#[async_trait]
impl OcrProviderTrait for OllamaProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Ollama
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn recognize_file(&self, image: &Path) -> Result<OcrResult, RecognitionError> {
        use base64::Engine;

        let image_data = read_image(image).await?;
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(&image_data);

        let prompt = format!(
            "Extract all text from this image exactly as written. The text is in {}. \
             Return only the extracted text, nothing else.",
            self.language
        );

        let request = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "images": [image_base64],
            "stream": false
        });

        let url = format!("{}/api/generate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RecognitionError::ApiError(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RecognitionError::ApiError(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let reply: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::ApiError(format!("Failed to parse response: {}", e)))?;

        let text = reply.into_text().map_err(RecognitionError::ApiError)?;

        Ok(OcrResult {
            text,
            provider: OcrProvider::Ollama,
        })
    }
}
