use super::{Journal, JournalEntry};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Journal kept in process memory (tests, CLI)
#[derive(Debug, Clone, Default)]
pub struct MemoryJournal {
    entries: Arc<Mutex<Vec<(String, JournalEntry)>>>,
}

impl MemoryJournal {
    /// Empty journal
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for one session, oldest first
    #[must_use]
    pub fn entries_for(&self, session_id: &str) -> Vec<JournalEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(id, _)| id == session_id)
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    /// Total records
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Journal for MemoryJournal {
    async fn append(&self, session_id: &str, entry: &JournalEntry) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((session_id.to_string(), entry.clone()));
        Ok(())
    }
}
