//! Solace Core - Conversation state and session orchestration
//!
//! This crate provides the stateful half of the Solace support assistant:
//! - Context: per-session conversation state, rolling history and latches
//! - Assessment: PHQ-9, GAD-7 and custom question banks with scoring
//! - Recommend: rule-based activity suggestions and the crisis resource list
//! - Generator: reply generation over an LLM provider or fixed templates
//! - Store: session persistence with optimistic versioning
//! - Journal: write-through record of what happened in a session
//! - Orchestrator: the per-utterance control loop

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod assessment;
pub mod clock;
pub mod context;
pub mod error;
pub mod event_bus;
pub mod generator;
pub mod journal;
pub mod orchestrator;
pub mod recommend;
pub mod store;

pub use assessment::{AssessmentKind, AssessmentResult, Question, Severity};
pub use clock::{Clock, ManualClock, SystemClock};
pub use context::{
    ContextSummary, Continuation, ConversationContext, ExpiryReason, PreferenceMap, Sender,
    Utterance,
};
pub use error::{format_error_for_cli, Error, Result, UserFriendlyError};
pub use event_bus::{EventBus, SessionEvent};
pub use generator::{LlmGenerator, TemplateGenerator, TextGenerator, FALLBACK_MESSAGE};
pub use journal::{Journal, JournalEntry, MemoryJournal, SqliteJournal};
pub use orchestrator::{Orchestrator, OrchestratorConfig, RecommendationQuery, TurnInput, TurnResult};
pub use recommend::{CurrentContext, Preferences, Recommendation, UserProfile};
pub use store::{MemoryStore, RedisStore, SessionStore, SqliteStore};
