//! Chat Module
//!
//! Question answering over ingested documents. The document text comes from
//! the session resolver; the answer comes from a language-model backend
//! (Gemini or Ollama).

mod backend;
mod service;
mod types;

pub use backend::{AnswerBackend, GeminiBackend, OllamaBackend};
pub use service::{build_prompt, ChatService, ChatServiceConfig};
pub use types::{ChatError, ChatProvider, ChatRequest, ChatResponse};
