use crate::error::LLMError;

use super::types::ChatCompletionResponse;

impl ChatCompletionResponse {
    /// Content of the first choice's message.
    ///
    /// A `null` content is returned as an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::Provider`] when the envelope carries no choice or the first
    /// choice has no message.
    pub fn first_text(self, provider: &'static str) -> Result<String, LLMError> {
        let choice = self
            .choices
            .into_iter()
            .min_by_key(|choice| choice.index)
            .ok_or_else(|| LLMError::provider(provider, "response contained no choices"))?;
        let message = choice
            .message
            .ok_or_else(|| LLMError::provider(provider, "first choice carried no message"))?;
        Ok(message.content.unwrap_or_default())
    }
}
