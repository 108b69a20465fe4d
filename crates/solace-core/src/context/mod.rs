//! Conversation Context
//!
//! The per-session state machine: a bounded utterance history, append-only
//! signal histories, derived mood and topic, one-way crisis/escalation
//! latches, and at most one assessment in progress.
//!
//! ## Transitions
//!
//! - `initialize`: clears everything and records timestamps
//! - `add_message` / `update_sentiment` / `update_intent`: append and recompute
//! - `start_assessment` / `add_assessment_response` / `complete_assessment`
//! - `continuation`: lazy idle/duration/handoff policy, never mutates

mod conversation;
mod types;


pub use conversation::ConversationContext;
pub use types::{
    AssessmentInProgress, CompletedAssessment, ContextSummary, Continuation, ExpiryReason,
    IntentEntry, MoodTrend, PreferenceMap, RecommendationRecord, Sender, SentimentEntry,
    SentimentTrend, Utterance, HISTORY_LIMIT, IDLE_LIMIT_SECS, MAX_SESSION_SECS, SUMMARY_WINDOW,
};
