//! Mock LLM Provider for testing
//!
//! Replies are scripted per call; when the script runs dry the provider
//! answers with a fixed "mock response".

use crate::error::{Error, Result};
use crate::prompt::{Completion, Prompt, TokenUsage};
use crate::provider::LlmProvider;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted reply
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text
    Text(String),
    /// Fail with an API error carrying this message
    Fail(String),
    /// Sleep, then return this text
    Delayed(Duration, String),
}

/// A mock LLM provider that returns queued replies or a default one.
#[derive(Clone)]
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    prompts: Arc<Mutex<Vec<Prompt>>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a new mock provider.
    #[must_use]
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful text reply.
    pub fn push_text(&self, text: impl Into<String>) {
        self.push(MockReply::Text(text.into()));
    }

    /// Queue a failing call.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.push(MockReply::Fail(message.into()));
    }

    /// Queue any scripted reply.
    pub fn push(&self, reply: MockReply) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
    }

    /// Prompts received so far, oldest first.
    #[must_use]
    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn respond(text: String) -> Completion {
        let completion_tokens = text.split_whitespace().count() as u32;
        Completion {
            text,
            model: "mock-model".to_string(),
            usage: Some(TokenUsage {
                prompt_tokens: 0,
                completion_tokens,
                total_tokens: completion_tokens,
            }),
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn available_models(&self) -> Vec<String> {
        vec!["mock-model".to_string()]
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, prompt: Prompt) -> Result<Completion> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt);

        let next = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match next {
            Some(MockReply::Text(text)) => Ok(Self::respond(text)),
            Some(MockReply::Fail(message)) => Err(Error::Api(message)),
            Some(MockReply::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(Self::respond(text))
            }
            None => Ok(Self::respond("mock response".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Speaker;

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let provider = MockProvider::new();
        provider.push_text("first");
        provider.push_failure("boom");

        let mut prompt = Prompt::new("Be kind");
        prompt.push(Speaker::User, "hi");
        let first = provider.complete(prompt.clone()).await.unwrap();
        assert_eq!(first.text, "first");

        let second = provider.complete(prompt.clone()).await;
        assert!(matches!(second, Err(Error::Api(ref m)) if m == "boom"));

        let fallback = provider.complete(prompt).await.unwrap();
        assert_eq!(fallback.text, "mock response");
        assert_eq!(provider.prompts().len(), 3);
    }
}
