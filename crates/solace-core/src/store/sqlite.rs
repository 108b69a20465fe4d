//! SQLite session storage backend
//!
//! Embedded and persistent; the recommended backend for a single process.
//!
//! ```no_run
//! use solace_core::store::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("/var/lib/solace/sessions.db").await?;
//! # Ok(())
//! # }
//! ```

use super::{version_conflict, SessionStore};
use crate::context::ConversationContext;
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Open (creating if missing) a WAL-mode SQLite pool
pub(crate) async fn open_pool(path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!("Failed to create database directory: {}", e))
            })?;
        }
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .map_err(|e| Error::Configuration(format!("Invalid SQLite path: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| Error::Storage(format!("Failed to connect to SQLite: {}", e)))
}

/// SQLite session store
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open a store at `path`
    ///
    /// # Errors
    ///
    /// Returns error if database creation or schema setup fails.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let pool = open_pool(path).await?;
        let store = Self::from_pool(pool).await?;
        info!(path = %path.display(), "SQLite session store initialized");
        Ok(store)
    }

    /// Build on an existing pool (shared with the journal)
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Underlying pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                session_id TEXT PRIMARY KEY,
                version INTEGER NOT NULL,
                session_data TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("SQLite session schema initialized");
        Ok(())
    }

    async fn stored_version(&self, session_id: &str) -> Result<Option<u64>> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT version FROM sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(v,)| v as u64))
    }
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn get(&self, session_id: &str) -> Result<Option<ConversationContext>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT session_data FROM sessions WHERE session_id = ?")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((data,)) => {
                let context: ConversationContext = serde_json::from_str(&data)?;
                debug!(session_id = %session_id, "Session loaded from SQLite");
                Ok(Some(context))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, context: &mut ConversationContext) -> Result<()> {
        let expected = context.version();
        let next = expected + 1;

        // serialize with the bumped version so loads see the stored token
        context.set_version(next);
        let data = serde_json::to_string(&*context);
        context.set_version(expected);
        let data = data?;

        let now = Utc::now().to_rfc3339();
        let result = if expected == 0 {
            sqlx::query(
                r#"
                INSERT INTO sessions (session_id, version, session_data, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT(session_id) DO NOTHING
                "#,
            )
            .bind(context.session_id())
            .bind(next as i64)
            .bind(&data)
            .bind(&now)
            .bind(&now)
            .execute(&self.pool)
            .await?
        } else {
            sqlx::query(
                r#"
                UPDATE sessions SET version = ?, session_data = ?, updated_at = ?
                WHERE session_id = ? AND version = ?
                "#,
            )
            .bind(next as i64)
            .bind(&data)
            .bind(&now)
            .bind(context.session_id())
            .bind(expected as i64)
            .execute(&self.pool)
            .await?
        };

        if result.rows_affected() == 0 {
            let found = self.stored_version(context.session_id()).await?;
            return Err(version_conflict(context.session_id(), expected, found));
        }

        context.set_version(next);
        debug!(session_id = %context.session_id(), version = next, "Session saved to SQLite");
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE session_id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        debug!(session_id = %session_id, deleted = deleted, "Session deleted from SQLite");
        Ok(deleted)
    }

    async fn exists(&self, session_id: &str) -> Result<bool> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 > 0)
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT session_id FROM sessions ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn count(&self) -> Result<usize> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Sender;
    use tempfile::TempDir;

    async fn create_test_store() -> (SqliteStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("sessions.db");
        let store = SqliteStore::new(&db_path).await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_sqlite_store_basic() {
        let (store, _dir) = create_test_store().await;

        let mut ctx = ConversationContext::new("s-1", Some("u-1".to_string()), Utc::now());
        ctx.add_text(Sender::User, "Hello", Utc::now());
        store.save(&mut ctx).await.unwrap();
        assert_eq!(ctx.version(), 1);

        let loaded = store.get("s-1").await.unwrap().unwrap();
        assert_eq!(loaded.version(), 1);
        assert_eq!(loaded.user_id(), Some("u-1"));
        assert_eq!(loaded.message_count(), 1);

        assert!(store.exists("s-1").await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.list_ids().await.unwrap(), vec!["s-1".to_string()]);

        assert!(store.delete("s-1").await.unwrap());
        assert!(store.get("s-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_version_conflict() {
        let (store, _dir) = create_test_store().await;

        let mut ctx = ConversationContext::new("s-1", None, Utc::now());
        store.save(&mut ctx).await.unwrap();

        let mut stale = store.get("s-1").await.unwrap().unwrap();
        ctx.add_text(Sender::User, "first", Utc::now());
        store.save(&mut ctx).await.unwrap();
        assert_eq!(ctx.version(), 2);

        stale.add_text(Sender::User, "second", Utc::now());
        let err = store.save(&mut stale).await.unwrap_err();
        assert!(matches!(err, Error::StateConflict(_)));

        // a second fresh context with the same id cannot overwrite either
        let mut duplicate = ConversationContext::new("s-1", None, Utc::now());
        assert!(store.save(&mut duplicate).await.is_err());
    }

    #[tokio::test]
    async fn test_sqlite_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("sessions.db");

        {
            let store = SqliteStore::new(&db_path).await.unwrap();
            let mut ctx = ConversationContext::new("s-1", None, Utc::now());
            store.save(&mut ctx).await.unwrap();
        }

        let store = SqliteStore::new(&db_path).await.unwrap();
        assert!(store.exists("s-1").await.unwrap());
    }
}
