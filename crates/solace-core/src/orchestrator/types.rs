//! Orchestrator result types

use crate::context::Continuation;
use crate::recommend::Recommendation;
use serde::Serialize;
use solace_llm::TokenUsage;
use solace_nlp::{CrisisCheck, Intent, IntentSignal, SentimentSignal};

/// Outcome of one turn
#[derive(Debug, Clone, Serialize)]
pub struct TurnResult {
    /// Session identifier
    pub session_id: String,
    /// Reply shown to the user
    pub response: String,
    /// `crisis` when crisis keywords matched, else the primary intent
    pub conversation_type: Intent,
    /// Sentiment of the user's message
    pub sentiment: SentimentSignal,
    /// Intent of the user's message
    pub intent: IntentSignal,
    /// Crisis keyword scan of the user's message
    pub crisis: CrisisCheck,
    /// Crisis match, high urgency or high sentiment risk on this turn
    pub escalation_needed: bool,
    /// Crisis match on this turn or crisis latched on the session
    pub crisis_detected: bool,
    /// Attached recommendations (emergency list on crisis)
    pub recommendations: Vec<Recommendation>,
    /// The generator failed or timed out; `response` is the fallback
    pub generator_failed: bool,
    /// The generated reply was unsafe and replaced by the fallback
    pub safety_flagged: bool,
    /// Generator token usage
    pub usage: Option<TokenUsage>,
    /// Continuation policy after this turn
    pub continuation: Continuation,
}
