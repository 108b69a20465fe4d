//! OpenAI - async-openai provider

use crate::error::{Error, Result};
use crate::prompt::{Completion, Prompt, Speaker, TokenUsage, Turn};
use crate::provider::LlmProvider;
use crate::util::{mask_api_key, sanitize_api_error};
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
    },
    Client,
};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Models offered by this provider
pub const MODELS: &[&str] = &["gpt-4", "gpt-4o", "gpt-4o-mini", "gpt-5", "gpt-5-nano"];

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the OpenAI provider
#[derive(Clone)]
pub struct OpenAiConfig {
    /// API key for authentication
    pub api_key: String,
    /// Optional custom base URL (for Azure OpenAI or proxies)
    pub base_url: Option<String>,
    /// Default model to use for completions
    pub default_model: String,
    /// Request timeout duration
    pub timeout: Duration,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            default_model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Creates configuration from `OPENAI_API_KEY`, `OPENAI_MODEL` and
    /// `OPENAI_BASE_URL`.
    ///
    /// # Errors
    /// Returns [`Error::NotConfigured`] if `OPENAI_API_KEY` is missing or blank
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::NotConfigured("OPENAI_API_KEY not set".to_string()))?;

        let mut config = Self::new(api_key);
        config.base_url = std::env::var("OPENAI_BASE_URL").ok();
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.default_model = model;
        }
        Ok(config)
    }

    /// Sets a custom base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the default model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Sets the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// OpenAI API provider for chat completions
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    default_model: String,
    timeout: Duration,
}

impl OpenAiProvider {
    /// Creates a new provider with the given configuration
    #[must_use]
    pub fn new(config: OpenAiConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(&config.api_key);

        if let Some(base_url) = &config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        Self {
            client: Client::with_config(openai_config),
            default_model: config.default_model,
            timeout: config.timeout,
        }
    }

    /// Creates a provider from environment variables
    ///
    /// # Errors
    /// Returns error if `OPENAI_API_KEY` is not set
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(OpenAiConfig::from_env()?))
    }

    fn chat_messages(prompt: &Prompt) -> Vec<ChatCompletionRequestMessage> {
        let system: ChatCompletionRequestMessage = ChatCompletionRequestSystemMessage {
            content: ChatCompletionRequestSystemMessageContent::Text(prompt.system.clone()),
            name: None,
        }
        .into();
        std::iter::once(system)
            .chain(prompt.turns.iter().map(Self::convert_turn))
            .collect()
    }

    fn convert_turn(turn: &Turn) -> ChatCompletionRequestMessage {
        match turn.speaker {
            Speaker::User => ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(turn.text.clone()),
                name: None,
            }
            .into(),
            Speaker::Assistant =>
            {
                #[allow(deprecated)]
                ChatCompletionRequestAssistantMessage {
                    content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                        turn.text.clone(),
                    )),
                    name: None,
                    tool_calls: None,
                    function_call: None,
                    refusal: None,
                    audio: None,
                }
                .into()
            }
        }
    }

    fn map_error(error: &async_openai::error::OpenAIError) -> Error {
        let message = error.to_string();
        let lower = message.to_lowercase();
        if lower.contains("rate limit") || lower.contains("429") {
            Error::RateLimit
        } else if matches!(error, async_openai::error::OpenAIError::Reqwest(_)) {
            Error::Network(sanitize_api_error(&message))
        } else {
            Error::Api(sanitize_api_error(&message))
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn available_models(&self) -> Vec<String> {
        MODELS.iter().map(|s| (*s).to_string()).collect()
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    #[instrument(skip(self, prompt), fields(model = %prompt.model, turns = prompt.turns.len()))]
    async fn complete(&self, prompt: Prompt) -> Result<Completion> {
        let model = if prompt.model.is_empty() {
            self.default_model.clone()
        } else {
            prompt.model.clone()
        };

        let openai_request = CreateChatCompletionRequest {
            model,
            messages: Self::chat_messages(&prompt),
            max_completion_tokens: Some(prompt.max_tokens),
            temperature: Some(prompt.temperature),
            ..Default::default()
        };

        debug!("Sending request to OpenAI");

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(openai_request))
            .await
            .map_err(|_| Error::Timeout(self.timeout.as_millis() as u64))?
            .map_err(|e| Self::map_error(&e))?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| Error::InvalidResponse("No choices in response".to_string()))?;

        let text = choice.message.content.clone().unwrap_or_default();

        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(Completion {
            text,
            model: response.model,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_debug_masks_key() {
        let config = OpenAiConfig::new("sk-1234567890abcdef").with_model("gpt-4o");
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("sk-1...cdef"));
        assert!(!rendered.contains("1234567890"));
        assert_eq!(config.default_model, "gpt-4o");
    }

    #[test]
    fn test_provider_defaults() {
        let provider = OpenAiProvider::new(
            OpenAiConfig::new("sk-test-key-123456").with_timeout(Duration::from_secs(5)),
        );
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.default_model(), DEFAULT_MODEL);
        assert!(provider.available_models().contains(&"gpt-4".to_string()));
    }

    #[test]
    fn test_system_instruction_leads_turns() {
        let mut prompt = Prompt::new("Be kind");
        prompt.push(Speaker::User, "hi");
        prompt.push(Speaker::Assistant, "hello");

        let messages = OpenAiProvider::chat_messages(&prompt);
        assert_eq!(messages.len(), 3);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(messages[2], ChatCompletionRequestMessage::Assistant(_)));
    }
}
