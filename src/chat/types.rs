//! Chat types

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Answer backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatProvider {
    Gemini,
    Ollama,
}

impl Default for ChatProvider {
    fn default() -> Self {
        Self::Gemini
    }
}

impl FromStr for ChatProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(format!("unknown chat provider '{}'", other)),
        }
    }
}

/// Question about an ingested document
///
/// Also accepts the older `chat_id` / `message` field names.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default, alias = "chat_id", alias = "chatId")]
    pub session_id: Option<String>,
    #[serde(default, alias = "message")]
    pub question: Option<String>,
}

/// Answer to a chat request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Chat error types
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Chat backend not configured: {0}")]
    NotConfigured(String),

    #[error("Chat backend failed: {0}")]
    Backend(String),
}
