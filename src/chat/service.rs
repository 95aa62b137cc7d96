//! Chat Service
//!
//! Answers questions grounded in the text of a previously ingested document.

use std::sync::Arc;

use serde::Deserialize;

use super::backend::{AnswerBackend, GeminiBackend, OllamaBackend};
use super::types::{ChatError, ChatProvider};
use crate::session::{SessionId, SessionLookup};

/// Chat service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatServiceConfig {
    pub provider: ChatProvider,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub ollama_url: String,
    pub ollama_model: String,
}

impl Default for ChatServiceConfig {
    fn default() -> Self {
        Self {
            provider: ChatProvider::Gemini,
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3".to_string(),
        }
    }
}

/// Grounded question answering over stored sessions
pub struct ChatService {
    sessions: Arc<dyn SessionLookup>,
    backend: Option<Arc<dyn AnswerBackend>>,
}

impl ChatService {
    /// Create a service with the backend named in `config`
    ///
    /// Gemini without an API key leaves the service unconfigured; questions
    /// then fail with `ChatError::NotConfigured`.
    pub fn new(config: &ChatServiceConfig, sessions: Arc<dyn SessionLookup>) -> Self {
        let backend: Option<Arc<dyn AnswerBackend>> = match config.provider {
            ChatProvider::Gemini => match config.gemini_api_key.as_deref() {
                Some(key) if !key.is_empty() => {
                    Some(Arc::new(GeminiBackend::new(key, &config.gemini_model)))
                }
                _ => {
                    tracing::warn!("GEMINI_API_KEY not set, chat is disabled");
                    None
                }
            },
            ChatProvider::Ollama => Some(Arc::new(OllamaBackend::new(
                &config.ollama_url,
                &config.ollama_model,
            ))),
        };

        Self { sessions, backend }
    }

    /// Create a service over an explicit backend
    pub fn with_backend(sessions: Arc<dyn SessionLookup>, backend: Arc<dyn AnswerBackend>) -> Self {
        Self {
            sessions,
            backend: Some(backend),
        }
    }

    /// Answer `question` using the document stored under `session_id`
    pub async fn ask(&self, session_id: &SessionId, question: &str) -> Result<String, ChatError> {
        let record = self
            .sessions
            .resolve(session_id)
            .await
            .ok_or_else(|| ChatError::SessionNotFound(session_id.to_string()))?;

        let backend = self
            .backend
            .as_ref()
            .ok_or_else(|| ChatError::NotConfigured("no answer backend".to_string()))?;

        let prompt = build_prompt(&record.document_text, question);

        tracing::debug!(
            session_id = %session_id,
            backend = backend.name(),
            prompt_chars = prompt.len(),
            "Asking answer backend"
        );

        backend.answer(&prompt).await
    }
}

/// Build the document-grounded prompt
pub fn build_prompt(document_text: &str, question: &str) -> String {
    format!(
        "You are a helpful assistant answering questions about the document below.\n\n\
         Document Content:\n{}\n\n\
         User Question: {}\n\n\
         Answer accurately using only the document content above. \
         If the question cannot be answered from the document, say so clearly.",
        document_text, question
    )
}
