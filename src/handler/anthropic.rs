use async_trait::async_trait;
use tracing::info;

use crate::error::LLMError;
use crate::logging::HANDLER_TARGET;
use crate::provider::anthropic_messages::{
    AnthropicMessage, AnthropicMessagesClient, MessagesRequest,
};

use super::{GenerationRequest, HandlerContext, ModelHandler};

/// Handler for Anthropic Messages; sends the prompt as a lone user turn.
pub struct AnthropicHandler {
    client: AnthropicMessagesClient,
    model: String,
}

impl AnthropicHandler {
    pub const DEFAULT_MODEL: &'static str = "claude-3-7-sonnet-20250219";
    pub const CREDENTIAL_VAR: &'static str = "ANTHROPIC_API_KEY";
    pub const MAX_TOKENS: u32 = 1000;

    /// Builds the handler with [`Self::DEFAULT_MODEL`].
    ///
    /// # Errors
    ///
    /// Only logging setup can fail.
    pub fn new(context: &HandlerContext) -> Result<Self, LLMError> {
        let api_key = context.prepare("anthropic", Self::CREDENTIAL_VAR)?;
        Ok(Self {
            client: AnthropicMessagesClient::new(context.transport(), api_key),
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

    fn build_request(request: GenerationRequest<'_>) -> MessagesRequest {
        MessagesRequest {
            model: request.model().to_string(),
            max_tokens: Self::MAX_TOKENS,
            messages: vec![AnthropicMessage::user(request.prompt())],
            system: None,
            temperature: None,
        }
    }
}

#[async_trait]
impl ModelHandler for AnthropicHandler {
    async fn generate_text(&self, prompt: &str) -> Result<String, LLMError> {
        let request = GenerationRequest::new(prompt, &self.model);
        info!(target: HANDLER_TARGET, "Sending prompt to Anthropic ({})", request.model());
        let response = self.client.create(&Self::build_request(request)).await?;
        info!(target: HANDLER_TARGET, "Successfully generated response from Claude");
        response.first_text(self.client.name())
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}
