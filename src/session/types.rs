//! Session types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix carried by every generated session id
pub const SESSION_ID_PREFIX: &str = "chat_";

/// Opaque session identifier
///
/// Generated once per successful ingestion from a v4 UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh, globally unique id
    pub fn generate() -> Self {
        Self(format!("{}{}", SESSION_ID_PREFIX, Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One ingested document, addressable by its session id
///
/// Records are append-only: once persisted, `document_text` never changes.
/// The legacy field names (`chatId`, `fileName`, `timestamp`) are accepted
/// when reading older store files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Unique lookup key
    #[serde(alias = "chatId")]
    pub session_id: SessionId,

    /// Original upload name (informational)
    #[serde(alias = "fileName")]
    pub source_file_name: String,

    /// Ingestion time
    #[serde(alias = "timestamp")]
    pub created_at: DateTime<Utc>,

    /// Full OCR text, pages joined by a newline
    pub document_text: String,
}

impl SessionRecord {
    /// Create a record for a freshly ingested document
    pub fn new(source_file_name: impl Into<String>, document_text: String) -> Self {
        Self {
            session_id: SessionId::generate(),
            source_file_name: source_file_name.into(),
            created_at: Utc::now(),
            document_text,
        }
    }
}
