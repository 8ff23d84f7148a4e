use std::collections::HashMap;

use crate::credential::ApiKey;
use crate::error::LLMError;
use crate::http::{DynHttpTransport, HttpResponse, post_json_with_headers};
use crate::provider::headers::retry_after_from_headers;

use super::error::parse_openai_error;
use super::types::{ChatCompletionRequest, ChatCompletionResponse};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai";

/// Chat Completions client for OpenAI and API-compatible vendors.
///
/// A missing key is accepted: the request goes out without an `Authorization`
/// header and the vendor's rejection comes back as [`LLMError::Auth`].
pub struct OpenAiChatClient {
    pub(crate) transport: DynHttpTransport,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<ApiKey>,
    pub(crate) provider: &'static str,
}

impl OpenAiChatClient {
    /// Client pointed at the OpenAI API.
    pub fn new(transport: DynHttpTransport, api_key: Option<ApiKey>) -> Self {
        Self {
            transport,
            base_url: OPENAI_BASE_URL.to_string(),
            api_key,
            provider: "openai_chat",
        }
    }

    /// Client pointed at Groq's OpenAI-compatible endpoint.
    pub fn groq(transport: DynHttpTransport, api_key: Option<ApiKey>) -> Self {
        Self {
            transport,
            base_url: GROQ_BASE_URL.to_string(),
            api_key,
            provider: "groq_chat",
        }
    }

    /// Overrides the base URL, e.g. for a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn name(&self) -> &'static str {
        self.provider
    }

    pub(crate) fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{base}/chat/completions")
        } else {
            format!("{base}/v1/chat/completions")
        }
    }

    fn build_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        if let Some(key) = &self.api_key {
            headers.insert(
                "Authorization".to_string(),
                format!("Bearer {}", key.expose()),
            );
        }
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers
    }

    fn ensure_success(&self, response: HttpResponse) -> Result<String, LLMError> {
        let status = response.status;
        let success = response.is_success();
        let retry_after = retry_after_from_headers(&response.headers);
        let text = response.into_string()?;
        if success {
            Ok(text)
        } else {
            Err(parse_openai_error(self.provider, status, &text, retry_after))
        }
    }

    /// Sends one non-streaming completion request.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx statuses mapped by status code, and bodies that do
    /// not parse as a completion envelope.
    pub async fn create(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LLMError> {
        let response = post_json_with_headers(
            self.transport.as_ref(),
            self.endpoint(),
            self.build_headers(),
            request,
        )
        .await?;
        let text = self.ensure_success(response)?;
        serde_json::from_str(&text).map_err(|err| {
            LLMError::provider(
                self.provider,
                format!("failed to parse chat completion: {err}"),
            )
        })
    }
}
