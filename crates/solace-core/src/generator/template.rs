use super::{Generation, GenerationRequest, TextGenerator};
use crate::error::Result;
use async_trait::async_trait;

/// Offline generator answering with one canned reply per conversation type
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    /// Create a template generator
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextGenerator for TemplateGenerator {
    fn name(&self) -> &str {
        "template"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        Ok(Generation {
            text: request.conversation_type.response_template().to_string(),
            usage: None,
            model: None,
        })
    }
}
