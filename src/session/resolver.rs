//! Read-only session access for the question-answering side

use async_trait::async_trait;

use super::store::SessionStore;
use super::types::{SessionId, SessionRecord};

/// Read-only session lookup
#[async_trait]
pub trait SessionLookup: Send + Sync {
    /// Find a session; `None` when the id was never issued
    async fn resolve(&self, session_id: &SessionId) -> Option<SessionRecord>;
}

/// Narrow facade over the session store
///
/// Hands out lookups only; there is no way to append through it.
#[derive(Clone)]
pub struct SessionResolver {
    store: SessionStore,
}

impl SessionResolver {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// Document text for a session, if it exists
    pub async fn document_text(&self, session_id: &SessionId) -> Option<String> {
        self.resolve(session_id).await.map(|record| record.document_text)
    }
}

#[async_trait]
impl SessionLookup for SessionResolver {
    async fn resolve(&self, session_id: &SessionId) -> Option<SessionRecord> {
        self.store.find_by_id(session_id).await
    }
}
