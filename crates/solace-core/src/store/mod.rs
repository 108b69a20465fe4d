//! Session storage
//!
//! Conversation contexts live behind the [`SessionStore`] trait so the
//! orchestrator never holds a process-wide registry:
//! - [`MemoryStore`]: development and tests, refused in production
//! - [`SqliteStore`]: embedded, persistent
//! - [`RedisStore`]: shared across processes, TTL expiry
//!
//! ## Optimistic versioning
//!
//! Every context carries a version. `save` succeeds only when the stored
//! version equals the context's version (0 for a session that was never
//! saved), then bumps it. A mismatch is a [`StateConflict`](crate::Error::StateConflict)
//! and nothing is written.

mod memory;
mod redis;
mod sqlite;

pub use self::redis::RedisStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub(crate) use sqlite::open_pool;

use crate::context::ConversationContext;
use crate::error::{Error, Result};
use async_trait::async_trait;

/// Storage backend for conversation contexts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session
    async fn get(&self, session_id: &str) -> Result<Option<ConversationContext>>;

    /// Save a session if nobody else saved it since it was loaded.
    /// On success the context's version is bumped in place.
    async fn save(&self, context: &mut ConversationContext) -> Result<()>;

    /// Delete a session
    async fn delete(&self, session_id: &str) -> Result<bool>;

    /// Check if a session exists
    async fn exists(&self, session_id: &str) -> Result<bool>;

    /// List all session ids (use with caution in production)
    async fn list_ids(&self) -> Result<Vec<String>>;

    /// Number of stored sessions
    async fn count(&self) -> Result<usize>;
}

fn version_conflict(session_id: &str, expected: u64, found: Option<u64>) -> Error {
    match found {
        Some(found) => Error::StateConflict(format!(
            "session {session_id} changed concurrently (expected version {expected}, found {found})"
        )),
        None => Error::StateConflict(format!(
            "session {session_id} was removed while being updated"
        )),
    }
}
