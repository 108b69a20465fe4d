//! In-memory session store

use super::{version_conflict, SessionStore};
use crate::context::ConversationContext;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

fn is_production() -> bool {
    std::env::var("SOLACE_ENV")
        .map(|v| v.to_lowercase() == "production")
        .unwrap_or(false)
}

fn is_production_bypass_enabled() -> bool {
    std::env::var("SOLACE_ALLOW_MEMORY_STORE")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// In-memory session store (for development/testing)
///
/// Sessions are lost on restart. With `SOLACE_ENV=production`,
/// [`try_new`](Self::try_new) refuses to build one unless
/// `SOLACE_ALLOW_MEMORY_STORE=1` is set.
#[derive(Clone)]
pub struct MemoryStore {
    sessions: Arc<RwLock<HashMap<String, ConversationContext>>>,
}

impl MemoryStore {
    /// Create a new memory store
    ///
    /// # Errors
    ///
    /// Returns a configuration error in production unless bypass is enabled.
    pub fn try_new() -> Result<Self> {
        if is_production() && !is_production_bypass_enabled() {
            error!(
                "MemoryStore is not allowed in production. \
                 Use the sqlite or redis backend, or set SOLACE_ALLOW_MEMORY_STORE=1"
            );
            return Err(Error::Configuration(
                "MemoryStore is not allowed in production. Use sqlite or redis instead."
                    .to_string(),
            ));
        }
        if is_production() {
            warn!("MemoryStore in production: sessions will not survive a restart");
        }

        info!("Initializing MemoryStore for session storage");
        Ok(Self::new_unchecked())
    }

    /// Create a store without the production check (tests, one-shot CLI runs)
    #[must_use]
    pub fn new_unchecked() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, session_id: &str) -> Result<Option<ConversationContext>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned())
    }

    async fn save(&self, context: &mut ConversationContext) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let expected = context.version();
        let found = sessions.get(context.session_id()).map(ConversationContext::version);

        match found {
            Some(v) if v == expected => {}
            None if expected == 0 => {}
            other => return Err(version_conflict(context.session_id(), expected, other)),
        }

        context.set_version(expected + 1);
        sessions.insert(context.session_id().to_string(), context.clone());
        debug!(session_id = %context.session_id(), version = context.version(), "Session saved in memory");
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<bool> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(session_id).is_some())
    }

    async fn exists(&self, session_id: &str) -> Result<bool> {
        let sessions = self.sessions.read().await;
        Ok(sessions.contains_key(session_id))
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.keys().cloned().collect())
    }

    async fn count(&self) -> Result<usize> {
        let sessions = self.sessions.read().await;
        Ok(sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Sender;
    use chrono::Utc;
    use std::sync::Mutex;

    // Tests touching environment variables must not interleave
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn ensure_non_production() {
        std::env::remove_var("SOLACE_ENV");
        std::env::remove_var("SOLACE_ALLOW_MEMORY_STORE");
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new_unchecked();
        assert_eq!(store.count().await.unwrap(), 0);

        let mut ctx = ConversationContext::new("s-1", None, Utc::now());
        ctx.add_text(Sender::User, "Hello", Utc::now());
        store.save(&mut ctx).await.unwrap();
        assert_eq!(ctx.version(), 1);

        assert!(store.exists("s-1").await.unwrap());
        let loaded = store.get("s-1").await.unwrap().unwrap();
        assert_eq!(loaded.message_count(), 1);
        assert_eq!(loaded.version(), 1);

        assert_eq!(store.list_ids().await.unwrap(), vec!["s-1".to_string()]);
        assert!(store.delete("s-1").await.unwrap());
        assert!(!store.exists("s-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_stale_save_is_rejected() {
        let store = MemoryStore::new_unchecked();
        let mut ctx = ConversationContext::new("s-1", None, Utc::now());
        store.save(&mut ctx).await.unwrap();

        let mut first = store.get("s-1").await.unwrap().unwrap();
        let mut second = store.get("s-1").await.unwrap().unwrap();

        first.add_text(Sender::User, "first", Utc::now());
        store.save(&mut first).await.unwrap();

        second.add_text(Sender::User, "second", Utc::now());
        let err = store.save(&mut second).await.unwrap_err();
        assert!(matches!(err, Error::StateConflict(_)));
        assert_eq!(second.version(), 1);

        let stored = store.get("s-1").await.unwrap().unwrap();
        assert_eq!(stored.history(None)[0].text, "first");
    }

    #[tokio::test]
    async fn test_save_after_delete_conflicts() {
        let store = MemoryStore::new_unchecked();
        let mut ctx = ConversationContext::new("s-1", None, Utc::now());
        store.save(&mut ctx).await.unwrap();
        store.delete("s-1").await.unwrap();

        assert!(matches!(
            store.save(&mut ctx).await,
            Err(Error::StateConflict(_))
        ));
    }

    #[test]
    fn test_production_checks() {
        let _lock = ENV_LOCK.lock().unwrap();

        ensure_non_production();
        assert!(MemoryStore::try_new().is_ok());

        std::env::set_var("SOLACE_ENV", "production");
        let result = MemoryStore::try_new();
        assert!(matches!(result, Err(Error::Configuration(_))));

        std::env::set_var("SOLACE_ALLOW_MEMORY_STORE", "1");
        assert!(MemoryStore::try_new().is_ok());

        ensure_non_production();
    }
}
