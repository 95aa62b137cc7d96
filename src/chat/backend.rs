//! Answer backends
//!
//! Language-model services that turn a grounded prompt into an answer.

use async_trait::async_trait;
use serde::Deserialize;

use super::types::ChatError;
use crate::ocr::OllamaGenerateResponse;

/// Answer generation backend
#[async_trait]
pub trait AnswerBackend: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Generate an answer for a fully built prompt
    async fn answer(&self, prompt: &str) -> Result<String, ChatError>;
}

/// Google Gemini backend (Generative Language REST API)
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL, api_key, model)
    }

    pub fn with_base_url(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        Some(text)
    }
}

#[async_trait]
impl AnswerBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn answer(&self, prompt: &str) -> Result<String, ChatError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let request = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Backend(format!("Failed to call Gemini: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Backend(format!("Gemini returned {}: {}", status, body)));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Backend(format!("Failed to parse Gemini response: {}", e)))?;

        parsed
            .into_text()
            .ok_or_else(|| ChatError::Backend("Gemini returned no candidates".to_string()))
    }
}

/// Ollama text generation backend
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl AnswerBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn answer(&self, prompt: &str) -> Result<String, ChatError> {
        let url = format!("{}/api/generate", self.base_url);

        let request = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false
        });

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Backend(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Backend(format!("Ollama returned {}: {}", status, body)));
        }

        let reply: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Backend(format!("Failed to parse response: {}", e)))?;

        reply.into_text().map_err(ChatError::Backend)
    }
}
