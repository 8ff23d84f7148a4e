use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::LLMError;

use super::{DynHttpTransport, HttpRequest, HttpResponse, HttpTransport};

/// Default [`HttpTransport`] backed by reqwest.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Wraps a caller-configured `reqwest::Client`.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client with reqwest defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::Transport`] when the TLS backend cannot be initialized.
    pub fn default_client() -> Result<Self, LLMError> {
        Client::builder()
            .build()
            .map(Self::new)
            .map_err(|err| LLMError::transport(format!("failed to create reqwest client: {err}")))
    }

    fn build_request(&self, mut request: HttpRequest) -> Result<reqwest::RequestBuilder, LLMError> {
        let mut builder = self.client.post(&request.url);

        for (name, value) in request.headers.drain() {
            let header_name = reqwest::header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| LLMError::transport(format!("invalid header name: {err}")))?;
            let header_value = reqwest::header::HeaderValue::from_str(&value).map_err(|err| {
                LLMError::transport(format!("invalid header value for {header_name}: {err}"))
            })?;
            builder = builder.header(header_name, header_value);
        }

        if let Some(body) = request.body.take() {
            builder = builder.body(body);
        }

        Ok(builder)
    }

    fn headers_to_map(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LLMError> {
        let response = self
            .build_request(request)?
            .send()
            .await
            .map_err(|err| LLMError::transport(err.to_string()))?;

        let status = response.status().as_u16();
        let headers = Self::headers_to_map(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|err| LLMError::transport(err.to_string()))?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Convenience constructor for a shareable reqwest transport.
///
/// # Errors
///
/// Propagates [`ReqwestTransport::default_client`] failures.
pub fn default_dyn_transport() -> Result<DynHttpTransport, LLMError> {
    Ok(Arc::new(ReqwestTransport::default_client()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_request_posts_body_with_headers() {
        let transport = ReqwestTransport::default_client().expect("transport");
        let request = HttpRequest::post_json("https://example.com/v1/messages", b"{}".to_vec());

        let built = transport
            .build_request(request)
            .expect("builder")
            .build()
            .expect("request");
        assert_eq!(built.method(), reqwest::Method::POST);
        assert_eq!(built.url().as_str(), "https://example.com/v1/messages");
        assert_eq!(
            built.headers().get("content-type").map(|value| value.as_bytes()),
            Some(&b"application/json"[..])
        );
        assert!(built.timeout().is_none());
    }

    #[test]
    fn build_request_rejects_invalid_header_names() {
        let transport = ReqwestTransport::default_client().expect("transport");
        let request = HttpRequest::post_json("https://example.com", Vec::new())
            .with_headers(HashMap::from([("bad header".to_string(), "x".to_string())]));

        match transport.build_request(request) {
            Err(LLMError::Transport { message }) => {
                assert!(message.contains("invalid header name"), "{message}");
            }
            Err(other) => panic!("unexpected error type: {other:?}"),
            Ok(_) => panic!("expected header validation failure"),
        }
    }
}
