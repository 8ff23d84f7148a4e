use crate::error::LLMError;

use super::types::MessagesResponse;

impl MessagesResponse {
    /// Text of the first `text` content block.
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::Provider`] when no text block is present.
    pub fn first_text(self, provider: &'static str) -> Result<String, LLMError> {
        self.content
            .into_iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text.unwrap_or_default())
            .ok_or_else(|| LLMError::provider(provider, "response contained no text block"))
    }
}
