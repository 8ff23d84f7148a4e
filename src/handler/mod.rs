//! Provider-agnostic text generation.
//!
//! [`ModelHandler`] is the single contract callers program against. Each variant owns
//! one provider client and turns a prompt into plain text, so code holding a
//! [`DynModelHandler`] never branches on the vendor.
//!
//! The trait is not a value and cannot be constructed:
//!
//! ```compile_fail
//! use model_handler::handler::ModelHandler;
//!
//! let handler = ModelHandler;
//! ```
//!
//! A handler type must supply `generate_text` itself; there is no default body:
//!
//! ```compile_fail
//! use model_handler::handler::ModelHandler;
//!
//! struct Incomplete;
//!
//! #[async_trait::async_trait]
//! impl ModelHandler for Incomplete {
//!     fn model(&self) -> &str { "m" }
//!     fn name(&self) -> &'static str { "incomplete" }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::credential::{ApiKey, CredentialSource, EnvCredentials};
use crate::error::LLMError;
use crate::http::DynHttpTransport;
use crate::http::reqwest::default_dyn_transport;
use crate::logging::{HANDLER_TARGET, LoggingConfig, init_logging};

pub mod anthropic;
pub mod clean;
pub mod groq;
pub mod openai;

pub use anthropic::AnthropicHandler;
pub use groq::GroqHandler;
pub use openai::OpenAiHandler;

/// System prompt sent by the handlers whose APIs take a system message.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// One text-generation capability over a chat-completion provider.
///
/// # Examples
///
/// ```
/// # use async_trait::async_trait;
/// # use model_handler::handler::ModelHandler;
/// # use model_handler::error::LLMError;
/// struct Echo;
///
/// #[async_trait]
/// impl ModelHandler for Echo {
///     async fn generate_text(&self, prompt: &str) -> Result<String, LLMError> {
///         Ok(prompt.to_uppercase())
///     }
///     fn model(&self) -> &str { "echo-1" }
///     fn name(&self) -> &'static str { "echo" }
/// }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let handler: Box<dyn ModelHandler> = Box::new(Echo);
/// assert_eq!(handler.generate_text("hi").await.unwrap(), "HI");
/// # });
/// ```
#[async_trait]
pub trait ModelHandler: Send + Sync {
    /// Sends `prompt` to the provider and returns the completion as plain text.
    ///
    /// Exactly one request is issued per call. Prompt length is not checked here.
    ///
    /// # Errors
    ///
    /// Whatever the provider client reports, unchanged: no retry, no fallback.
    async fn generate_text(&self, prompt: &str) -> Result<String, LLMError>;

    /// Model identifier forwarded to the provider.
    fn model(&self) -> &str;

    /// Short handler name, such as `groq`.
    fn name(&self) -> &'static str;
}

/// Shareable handler.
pub type DynModelHandler = Arc<dyn ModelHandler>;

/// A prompt bound to the model it will be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest<'a> {
    prompt: &'a str,
    model: &'a str,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(prompt: &'a str, model: &'a str) -> Self {
        Self { prompt, model }
    }

    pub fn prompt(&self) -> &'a str {
        self.prompt
    }

    pub fn model(&self) -> &'a str {
        self.model
    }
}

/// Everything a handler needs at construction time.
///
/// Logging configuration, credential lookup and the HTTP transport are passed in
/// rather than discovered, so tests can supply fakes for all three.
#[derive(Clone)]
pub struct HandlerContext {
    transport: DynHttpTransport,
    credentials: Arc<dyn CredentialSource>,
    logging: Option<LoggingConfig>,
}

impl HandlerContext {
    /// Context without logging setup; the embedding application owns the subscriber.
    pub fn new(transport: DynHttpTransport, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            transport,
            credentials,
            logging: None,
        }
    }

    /// Reqwest transport, process-environment credentials and default logging.
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::Transport`] when the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, LLMError> {
        Ok(Self::new(default_dyn_transport()?, Arc::new(EnvCredentials))
            .with_logging(LoggingConfig::default()))
    }

    /// Installs `config` the first time a handler is built from this context.
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    pub fn transport(&self) -> DynHttpTransport {
        self.transport.clone()
    }

    /// Shared construction steps: logging, then the credential lookup.
    ///
    /// A missing credential is not an error here.
    pub(crate) fn prepare(
        &self,
        handler: &'static str,
        credential_var: &str,
    ) -> Result<Option<ApiKey>, LLMError> {
        if let Some(config) = &self.logging {
            init_logging(config)?;
        }
        let key = self.credentials.lookup(credential_var);
        if key.is_none() {
            debug!(
                target: HANDLER_TARGET,
                handler,
                "{credential_var} is not set; the provider will reject requests"
            );
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::StaticCredentials;
    use crate::http::{HttpRequest, HttpResponse, HttpTransport};

    struct UnusedTransport;

    #[async_trait]
    impl HttpTransport for UnusedTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, LLMError> {
            panic!("send should not be called");
        }
    }

    #[test]
    fn prepare_tolerates_missing_credentials() {
        let context = HandlerContext::new(
            Arc::new(UnusedTransport),
            Arc::new(StaticCredentials::new().with("GROQ_API_KEY", "gsk")),
        );
        let present = context.prepare("groq", "GROQ_API_KEY").expect("prepare");
        assert_eq!(present.map(|key| key.expose().to_string()), Some("gsk".into()));

        let missing = context.prepare("openai", "OPENAI_API_KEY").expect("prepare");
        assert!(missing.is_none());
    }

    #[test]
    fn prepare_surfaces_bad_logging_config() {
        let context = HandlerContext::new(
            Arc::new(UnusedTransport),
            Arc::new(StaticCredentials::new()),
        )
        .with_logging(LoggingConfig {
            handler_level: "verbose-ish".to_string(),
            ..LoggingConfig::stdout_only()
        });

        assert!(matches!(
            context.prepare("openai", "OPENAI_API_KEY"),
            Err(LLMError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn generation_request_borrows_inputs() {
        let prompt = String::from("Explain ownership");
        let request = GenerationRequest::new(&prompt, "gpt-4o-mini");
        assert_eq!(request.prompt(), "Explain ownership");
        assert_eq!(request.model(), "gpt-4o-mini");
    }
}
