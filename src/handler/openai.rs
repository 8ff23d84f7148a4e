use async_trait::async_trait;
use tracing::info;

use crate::error::LLMError;
use crate::logging::HANDLER_TARGET;
use crate::provider::openai_chat::{ChatCompletionRequest, ChatMessage, OpenAiChatClient};

use super::{DEFAULT_SYSTEM_PROMPT, GenerationRequest, HandlerContext, ModelHandler};

/// Handler for OpenAI Chat Completions.
pub struct OpenAiHandler {
    client: OpenAiChatClient,
    model: String,
}

impl OpenAiHandler {
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";
    pub const CREDENTIAL_VAR: &'static str = "OPENAI_API_KEY";
    pub const TEMPERATURE: f32 = 0.7;

    /// Builds the handler with [`Self::DEFAULT_MODEL`].
    ///
    /// # Errors
    ///
    /// Only logging setup can fail; a missing `OPENAI_API_KEY` is reported by the
    /// provider on the first call.
    pub fn new(context: &HandlerContext) -> Result<Self, LLMError> {
        let api_key = context.prepare("openai", Self::CREDENTIAL_VAR)?;
        Ok(Self {
            client: OpenAiChatClient::new(context.transport(), api_key),
            model: Self::DEFAULT_MODEL.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(base_url);
        self
    }

    fn build_request(request: GenerationRequest<'_>) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.model().to_string(),
            messages: vec![
                ChatMessage::system(DEFAULT_SYSTEM_PROMPT),
                ChatMessage::user(request.prompt()),
            ],
            temperature: Some(Self::TEMPERATURE),
            max_tokens: None,
        }
    }
}

#[async_trait]
impl ModelHandler for OpenAiHandler {
    async fn generate_text(&self, prompt: &str) -> Result<String, LLMError> {
        let request = GenerationRequest::new(prompt, &self.model);
        info!(target: HANDLER_TARGET, "Sending prompt to OpenAI ({})", request.model());
        let response = self.client.create(&Self::build_request(request)).await?;
        info!(target: HANDLER_TARGET, "Successfully generated response from OpenAI");
        response.first_text(self.client.name())
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
