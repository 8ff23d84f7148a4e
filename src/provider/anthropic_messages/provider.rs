use std::collections::HashMap;

use crate::credential::ApiKey;
use crate::error::LLMError;
use crate::http::{DynHttpTransport, HttpResponse, post_json_with_headers};
use crate::provider::headers::retry_after_from_headers;

use super::error::parse_anthropic_error;
use super::types::{MessagesRequest, MessagesResponse};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages client (Claude 3.x Messages API).
pub struct AnthropicMessagesClient {
    pub(crate) transport: DynHttpTransport,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<ApiKey>,
    pub(crate) version: String,
}

impl AnthropicMessagesClient {
    /// Uses the default base URL and `anthropic-version`.
    pub fn new(transport: DynHttpTransport, api_key: Option<ApiKey>) -> Self {
        Self {
            transport,
            base_url: ANTHROPIC_BASE_URL.to_string(),
            api_key,
            version: ANTHROPIC_VERSION.to_string(),
        }
    }

    /// Overrides the base URL, e.g. for a proxy or compatibility layer.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the `anthropic-version` header.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn name(&self) -> &'static str {
        "anthropic_messages"
    }

    pub(crate) fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{base}/messages")
        } else {
            format!("{base}/v1/messages")
        }
    }

    fn build_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        if let Some(key) = &self.api_key {
            headers.insert("x-api-key".to_string(), key.expose().to_string());
        }
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers.insert("anthropic-version".to_string(), self.version.clone());
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
            Err(parse_anthropic_error(status, &text, retry_after))
        }
    }

    /// Sends one non-streaming Messages request.
    ///
    /// # Errors
    ///
    /// Transport failures, non-2xx statuses mapped by status code, and bodies that do
    /// not parse as a Messages envelope.
    pub async fn create(&self, request: &MessagesRequest) -> Result<MessagesResponse, LLMError> {
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
                self.name(),
                format!("failed to parse Anthropic response: {err}"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpRequest, HttpTransport};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct UnusedTransport;

    #[async_trait]
    impl HttpTransport for UnusedTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, LLMError> {
            panic!("send should not be called");
        }
    }

    #[test]
    fn headers_carry_version_and_optional_key() {
        let client = AnthropicMessagesClient::new(Arc::new(UnusedTransport), None);
        let headers = client.build_headers();
        assert_eq!(
            headers.get("anthropic-version").map(String::as_str),
            Some(ANTHROPIC_VERSION)
        );
        assert!(!headers.contains_key("x-api-key"));

        let client = AnthropicMessagesClient::new(
            Arc::new(UnusedTransport),
            Some(ApiKey::new("sk-ant-test")),
        )
        .with_version("2024-01-01");
        let headers = client.build_headers();
        assert_eq!(
            headers.get("x-api-key").map(String::as_str),
            Some("sk-ant-test")
        );
        assert_eq!(
            headers.get("anthropic-version").map(String::as_str),
            Some("2024-01-01")
        );
    }

    #[test]
    fn endpoint_handles_versioned_base() {
        let client = AnthropicMessagesClient::new(Arc::new(UnusedTransport), None);
        assert_eq!(client.endpoint(), "https://api.anthropic.com/v1/messages");
        let client = client.with_base_url("https://proxy.local/v1");
        assert_eq!(client.endpoint(), "https://proxy.local/v1/messages");
    }
}
