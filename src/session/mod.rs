//! Session Module
//!
//! Durable mapping from session id to the OCR text of one ingested document.
//!
//! - `store`: append-only JSON file store with a single writer lock
//! - `resolver`: read-only facade used by the chat service

mod resolver;
mod store;
mod types;

pub use resolver::{SessionLookup, SessionResolver};
pub use store::{SessionStore, StoreError};
pub use types::{SessionId, SessionRecord, SESSION_ID_PREFIX};
