//! Write-through journal
//!
//! Durable append of what happened in a session: utterances, scored
//! assessments, recommendations given and their follow-up flags. The core
//! only writes; reading the journal back is the host's business.
//!
//! Journal failures never fail a turn. The orchestrator logs them and moves
//! on.

mod memory;
mod sqlite;

pub use memory::MemoryJournal;
pub use sqlite::SqliteJournal;

use crate::assessment::AssessmentResult;
use crate::context::Utterance;
use crate::error::Result;
use crate::recommend::Recommendation;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One journal record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JournalEntry {
    /// A user or bot message
    Utterance {
        /// The message
        utterance: Utterance,
    },
    /// A scored assessment
    Assessment {
        /// The result
        result: AssessmentResult,
    },
    /// A recommendation shown to the user
    Recommendation {
        /// Position in the session's recommendation list
        index: usize,
        /// What was recommended
        recommendation: Recommendation,
    },
    /// Follow-up flags of a recommendation changed
    RecommendationStatus {
        /// Position in the session's recommendation list
        index: usize,
        /// Accepted by the user
        accepted: bool,
        /// Completed by the user
        completed: bool,
    },
}

impl JournalEntry {
    /// Short record kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Utterance { .. } => "utterance",
            Self::Assessment { .. } => "assessment",
            Self::Recommendation { .. } => "recommendation",
            Self::RecommendationStatus { .. } => "recommendation_status",
        }
    }
}

/// Append-only persistence for session records
#[async_trait]
pub trait Journal: Send + Sync {
    /// Append one record for `session_id`
    async fn append(&self, session_id: &str, entry: &JournalEntry) -> Result<()>;

    /// Append a message
    async fn append_utterance(&self, session_id: &str, utterance: &Utterance) -> Result<()> {
        let entry = JournalEntry::Utterance {
            utterance: utterance.clone(),
        };
        self.append(session_id, &entry).await
    }

    /// Append a scored assessment
    async fn record_assessment(&self, session_id: &str, result: &AssessmentResult) -> Result<()> {
        let entry = JournalEntry::Assessment {
            result: result.clone(),
        };
        self.append(session_id, &entry).await
    }

    /// Append a recommendation shown at `index`
    async fn record_recommendation(
        &self,
        session_id: &str,
        index: usize,
        recommendation: &Recommendation,
    ) -> Result<()> {
        let entry = JournalEntry::Recommendation {
            index,
            recommendation: recommendation.clone(),
        };
        self.append(session_id, &entry).await
    }

    /// Append new follow-up flags for the recommendation at `index`
    async fn record_recommendation_status(
        &self,
        session_id: &str,
        index: usize,
        accepted: bool,
        completed: bool,
    ) -> Result<()> {
        let entry = JournalEntry::RecommendationStatus {
            index,
            accepted,
            completed,
        };
        self.append(session_id, &entry).await
    }
}
