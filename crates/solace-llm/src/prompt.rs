//! Prompt and completion types
//!
//! A prompt is one system instruction followed by the conversation turns,
//! oldest first. The last turn is the message being answered.

use serde::{Deserialize, Serialize};

/// Who spoke a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// The person seeking support
    User,
    /// A previous model reply
    Assistant,
}

/// One conversation turn
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// Who spoke
    pub speaker: Speaker,
    /// What was said
    pub text: String,
}

/// A chat completion request
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Model name; empty selects the provider default
    pub model: String,
    /// System instruction
    pub system: String,
    /// Conversation turns, oldest first
    pub turns: Vec<Turn>,
    /// Reply length cap
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Prompt {
    /// Start a prompt with the provider's default model
    #[must_use]
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            model: String::new(),
            system: system.into(),
            turns: Vec::new(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }

    /// Select a model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the reply length cap and temperature
    #[must_use]
    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    /// Append a turn
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.turns.push(Turn {
            speaker,
            text: text.into(),
        });
    }
}

/// Token counts reported by a provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

/// A provider's answer
#[derive(Debug, Clone)]
pub struct Completion {
    /// Reply text, untrimmed
    pub text: String,
    /// Model that answered
    pub model: String,
    /// Token usage, when reported
    pub usage: Option<TokenUsage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_keeps_turn_order() {
        let mut prompt = Prompt::new("Be kind").with_sampling(200, 0.2);
        prompt.push(Speaker::User, "I feel low today");
        prompt.push(Speaker::Assistant, "I'm here with you.");
        prompt.push(Speaker::User, "thanks");

        assert!(prompt.model.is_empty());
        assert_eq!(prompt.max_tokens, 200);
        let speakers: Vec<Speaker> = prompt.turns.iter().map(|t| t.speaker).collect();
        assert_eq!(
            speakers,
            vec![Speaker::User, Speaker::Assistant, Speaker::User]
        );
        assert_eq!(prompt.turns[2].text, "thanks");
    }
}
