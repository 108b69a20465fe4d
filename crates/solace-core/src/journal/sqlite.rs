use super::{Journal, JournalEntry};
use crate::error::Result;
use crate::store::open_pool;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use std::path::Path;
use tracing::debug;

/// SQLite journal; one row per record with the entry as JSON
#[derive(Clone)]
pub struct SqliteJournal {
    pool: SqlitePool,
}

impl SqliteJournal {
    /// Open a journal at `path`
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let pool = open_pool(path.as_ref()).await?;
        Self::from_pool(pool).await
    }

    /// Build on an existing pool (e.g. the session store's)
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS journal (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                payload TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_journal_session ON journal(session_id)")
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }

    /// Records for one session, oldest first
    pub async fn entries_for(&self, session_id: &str) -> Result<Vec<JournalEntry>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT payload FROM journal WHERE session_id = ? ORDER BY id")
                .bind(session_id)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(payload,)| serde_json::from_str(&payload).map_err(Into::into))
            .collect()
    }
}

#[async_trait]
impl Journal for SqliteJournal {
    async fn append(&self, session_id: &str, entry: &JournalEntry) -> Result<()> {
        let payload = serde_json::to_string(entry)?;
        sqlx::query(
            "INSERT INTO journal (session_id, kind, payload, recorded_at) VALUES (?, ?, ?, ?)",
        )
        .bind(session_id)
        .bind(entry.kind())
        .bind(&payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(session_id = %session_id, kind = entry.kind(), "Journal entry appended");
        Ok(())
    }
}
