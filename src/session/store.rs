//! Session Store
//!
//! Durable, append-only collection of session records kept as a single JSON
//! array on the local filesystem.
//!
//! - Appends are serialized through one writer lock shared by every clone of
//!   the store, so concurrent read-modify-write cycles cannot lose records.
//! - The new collection is written to a temp file in the same directory,
//!   fsynced, then renamed over the old file. Readers take no lock and see
//!   either the previous or the next collection, never a partial one.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::types::{SessionId, SessionRecord};

/// Session store error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read session store: {0}")]
    Read(#[source] std::io::Error),

    #[error("Session store is not a valid session list: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Failed to write session store: {0}")]
    Write(#[source] std::io::Error),

    #[error("Session id already exists: {0}")]
    DuplicateId(SessionId),

    #[error("Store task failed: {0}")]
    Task(String),
}

/// File-backed session store
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    /// Location of the JSON collection
    path: PathBuf,
    /// Guards the read-modify-write cycle of `append`
    write_lock: Mutex<()>,
}

impl SessionStore {
    /// Create a store backed by `path`
    ///
    /// The file is created on the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                path: path.into(),
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Durably append a record
    pub async fn append(&self, record: SessionRecord) -> Result<(), StoreError> {
        let inner = Arc::clone(&self.inner);
        let session_id = record.session_id.clone();

        tokio::task::spawn_blocking(move || inner.append_blocking(record))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))??;

        tracing::debug!(
            session_id = %session_id,
            path = %self.inner.path.display(),
            "Session record appended"
        );

        Ok(())
    }

    /// Look up a record by id
    ///
    /// Never fails: an absent store, an unknown id, or an unreadable store
    /// all yield `None` (the last one is logged).
    pub async fn find_by_id(&self, session_id: &SessionId) -> Option<SessionRecord> {
        let inner = Arc::clone(&self.inner);
        let wanted = session_id.clone();

        let lookup = tokio::task::spawn_blocking(move || {
            inner
                .read_all()
                .map(|records| records.into_iter().find(|r| r.session_id == wanted))
        })
        .await;

        match lookup {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %e,
                    "Session lookup failed, treating as not found"
                );
                None
            }
            Err(e) => {
                tracing::error!(session_id = %session_id, error = %e, "Session lookup task failed");
                None
            }
        }
    }

    /// All records in append order
    pub async fn list(&self) -> Result<Vec<SessionRecord>, StoreError> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.read_all())
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// Number of stored records
    pub async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.list().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len().await? == 0)
    }
}

impl SessionStoreInner {
    /// Read the whole collection; an absent or blank file is empty
    fn read_all(&self) -> Result<Vec<SessionRecord>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Read(e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn append_blocking(&self, record: SessionRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();

        let mut records = self.read_all()?;
        if records.iter().any(|r| r.session_id == record.session_id) {
            return Err(StoreError::DuplicateId(record.session_id));
        }

        records.push(record);
        self.replace_all(&records)
    }

    /// Replace the file contents with `records` via temp file + rename
    fn replace_all(&self, records: &[SessionRecord]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(StoreError::Write)?;

        let json = serde_json::to_vec_pretty(records).map_err(|e| StoreError::Write(e.into()))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".sessions-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(StoreError::Write)?;
        tmp.write_all(&json).map_err(StoreError::Write)?;
        tmp.as_file().sync_all().map_err(StoreError::Write)?;

        tmp.persist(&self.path)
            .map_err(|e| StoreError::Write(e.error))?;

        Ok(())
    }
}
