//! Reply generation
//!
//! The orchestrator's one suspend point. A [`TextGenerator`] turns the
//! conversation type, the user's message, recent history and the context
//! block into reply text. Generators may fail or hang; the orchestrator
//! bounds them with a timeout and substitutes [`FALLBACK_MESSAGE`].

mod llm;
mod template;

pub use llm::{system_prompt, LlmGenerator};
pub use template::TemplateGenerator;

use crate::context::Utterance;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use solace_llm::TokenUsage;
use solace_nlp::Intent;

/// Reply used whenever generation fails, times out or is unsafe
pub const FALLBACK_MESSAGE: &str = "I apologize, but I'm having trouble processing your message right now. Please try again in a moment.";

/// Phrases a reply must never contain
const UNSAFE_PHRASES: [&str; 3] = ["kill yourself", "hurt yourself", "end it all"];

/// Everything a generator may use for one reply
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// `crisis` or the primary intent
    pub conversation_type: Intent,
    /// The message being answered
    pub user_message: String,
    /// Earlier utterances, oldest first, excluding `user_message`
    pub history: Vec<Utterance>,
    /// Plain-text context block
    pub context_summary: String,
}

/// A generated reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    /// Reply text
    pub text: String,
    /// Token usage, when the backend reports it
    pub usage: Option<TokenUsage>,
    /// Model that produced the reply
    pub model: Option<String>,
}

/// Produces reply text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generator name for logs
    fn name(&self) -> &str;

    /// Generate a reply
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation>;
}

/// Result of screening a reply
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SafetyCheck {
    /// No unsafe phrase found
    pub is_safe: bool,
    /// Unsafe phrases found
    pub flagged_phrases: Vec<String>,
}

/// Screen a reply for unsafe phrases (case-insensitive substring match)
#[must_use]
pub fn safety_check(text: &str) -> SafetyCheck {
    let lower = text.to_lowercase();
    let flagged_phrases: Vec<String> = UNSAFE_PHRASES
        .iter()
        .filter(|p| lower.contains(*p))
        .map(|p| (*p).to_string())
        .collect();

    SafetyCheck {
        is_safe: flagged_phrases.is_empty(),
        flagged_phrases,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safety_check() {
        assert!(safety_check("Let's take a slow breath together.").is_safe);

        let check = safety_check("You should never Hurt Yourself.");
        assert!(!check.is_safe);
        assert_eq!(check.flagged_phrases, vec!["hurt yourself".to_string()]);
    }

    #[test]
    fn test_fallback_is_safe() {
        assert!(safety_check(FALLBACK_MESSAGE).is_safe);
    }
}
