//! LLM Provider trait definition

use crate::prompt::{Completion, Prompt};
use crate::error::Result;

/// Trait for LLM providers
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Get available models
    fn available_models(&self) -> Vec<String>;

    /// Get the default model
    fn default_model(&self) -> &str;

    /// Answer the last turn of a prompt
    async fn complete(&self, prompt: Prompt) -> Result<Completion>;
}
