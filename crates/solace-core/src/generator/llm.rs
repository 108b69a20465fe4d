use super::{Generation, GenerationRequest, TextGenerator};
use crate::context::Sender;
use crate::error::Result;
use async_trait::async_trait;
use solace_llm::{LlmProvider, Prompt, Speaker};
use solace_nlp::Intent;
use std::sync::Arc;
use tracing::debug;

const GENERAL_PROMPT: &str = "You are an empathetic mental health support assistant. Your role is to:
1. Provide emotional support and validation
2. Listen actively and respond with empathy
3. Offer practical coping strategies when appropriate
4. Encourage professional help when needed
5. Maintain a warm, non-judgmental tone
6. Ask thoughtful follow-up questions
7. Never provide medical diagnoses or replace professional therapy

You are here to support, not to diagnose or treat.";

const CRISIS_PROMPT: &str = "You are a mental health crisis support assistant. Your role is to:
1. Take any mention of self-harm or suicide seriously
2. Provide immediate emotional support
3. Encourage contacting crisis hotlines or emergency services
4. Stay calm and supportive
5. Never minimize the person's feelings
6. Provide crisis resources immediately

CRISIS RESOURCES:
- National Suicide Prevention Lifeline: 988
- Crisis Text Line: Text HOME to 741741
- Emergency Services: 911";

const ASSESSMENT_PROMPT: &str = "You are conducting a mental health assessment. Your role is to:
1. Ask assessment questions in a supportive manner
2. Validate the person's responses
3. Explain the purpose of each question
4. Maintain a non-judgmental approach
5. Provide reassurance about confidentiality
6. Guide through the assessment process smoothly";

const RECOMMENDATIONS_PROMPT: &str = "You are providing personalized mental health recommendations. Your role is to:
1. Suggest evidence-based coping strategies
2. Recommend appropriate activities and exercises
3. Provide resources and tools
4. Consider the person's current mental state
5. Offer practical, actionable advice
6. Encourage gradual progress";

/// History turns forwarded to the model
const PROMPT_HISTORY: usize = 10;

/// System prompt for a conversation type
#[must_use]
pub fn system_prompt(conversation_type: Intent) -> &'static str {
    match conversation_type {
        Intent::Crisis => CRISIS_PROMPT,
        Intent::AssessmentRequest => ASSESSMENT_PROMPT,
        Intent::RecommendationRequest => RECOMMENDATIONS_PROMPT,
        _ => GENERAL_PROMPT,
    }
}

/// Generator backed by an [`LlmProvider`]
#[derive(Clone)]
pub struct LlmGenerator {
    provider: Arc<dyn LlmProvider>,
    model: Option<String>,
    max_tokens: u32,
    temperature: f32,
}

impl LlmGenerator {
    /// Use the provider's default model
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            model: None,
            max_tokens: 1000,
            temperature: 0.7,
        }
    }

    /// Override the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set max tokens
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn build_prompt(&self, request: &GenerationRequest) -> Prompt {
        let mut system = system_prompt(request.conversation_type).to_string();
        if !request.context_summary.is_empty() {
            system.push_str("\n\nCurrent context:\n");
            system.push_str(&request.context_summary);
        }

        let model = self
            .model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string());
        let mut prompt = Prompt::new(system)
            .with_model(model)
            .with_sampling(self.max_tokens, self.temperature);

        let skip = request.history.len().saturating_sub(PROMPT_HISTORY);
        for utterance in request.history.iter().skip(skip) {
            let speaker = match utterance.sender {
                Sender::User => Speaker::User,
                Sender::Bot => Speaker::Assistant,
            };
            prompt.push(speaker, utterance.text.clone());
        }
        prompt.push(Speaker::User, request.user_message.clone());
        prompt
    }
}

#[async_trait]
impl TextGenerator for LlmGenerator {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        let prompt = self.build_prompt(request);
        debug!(
            provider = self.provider.name(),
            conversation_type = %request.conversation_type,
            turns = prompt.turns.len(),
            "Requesting reply"
        );

        let completion = self.provider.complete(prompt).await?;
        Ok(Generation {
            text: completion.text.trim().to_string(),
            usage: completion.usage,
            model: Some(completion.model),
        })
    }
}
