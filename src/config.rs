use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::LLMError;
use crate::handler::{
    AnthropicHandler, DynModelHandler, GroqHandler, HandlerContext, OpenAiHandler,
};
use crate::logging::LoggingConfig;
use crate::registry::HandlerRegistry;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

/// One callable handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Caller-chosen name, e.g. `default-groq`.
    pub handle: String,
    pub kind: HandlerKind,
    /// Overrides the variant's default model.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Provider behind a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    #[serde(rename = "openai", alias = "open_ai")]
    OpenAi,
    Anthropic,
    Groq,
}

impl std::str::FromStr for HandlerKind {
    type Err = LLMError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "openai" | "open_ai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "groq" => Ok(Self::Groq),
            other => Err(LLMError::invalid_config(
                "kind",
                format!("unknown handler kind `{other}`"),
            )),
        }
    }
}

impl AppConfig {
    /// # Errors
    ///
    /// [`LLMError::InvalidConfig`] when the text is not valid TOML for this schema.
    pub fn from_toml_str(text: &str) -> Result<Self, LLMError> {
        toml::from_str(text).map_err(|err| LLMError::invalid_config("config", err.to_string()))
    }

    /// # Errors
    ///
    /// [`LLMError::InvalidConfig`] when the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LLMError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            LLMError::invalid_config(path.display().to_string(), format!("cannot read: {err}"))
        })?;
        Self::from_toml_str(&text)
    }
}

/// Builds the handler described by `config`.
///
/// # Errors
///
/// Propagates handler construction failures.
pub fn build_handler(
    config: &HandlerConfig,
    context: &HandlerContext,
) -> Result<DynModelHandler, LLMError> {
    let handler: DynModelHandler = match config.kind {
        HandlerKind::OpenAi => {
            let mut handler = OpenAiHandler::new(context)?;
            if let Some(model) = &config.model {
                handler = handler.with_model(model.clone());
            }
            if let Some(base_url) = &config.base_url {
                handler = handler.with_base_url(base_url.clone());
            }
            Arc::new(handler)
        }
        HandlerKind::Anthropic => {
            let mut handler = AnthropicHandler::new(context)?;
            if let Some(model) = &config.model {
                handler = handler.with_model(model.clone());
            }
            if let Some(base_url) = &config.base_url {
                handler = handler.with_base_url(base_url.clone());
            }
            Arc::new(handler)
        }
        HandlerKind::Groq => {
            let mut handler = GroqHandler::new(context)?;
            if let Some(model) = &config.model {
                handler = handler.with_model(model.clone());
            }
            if let Some(base_url) = &config.base_url {
                handler = handler.with_base_url(base_url.clone());
            }
            Arc::new(handler)
        }
    };

    Ok(handler)
}

/// Builds and registers every configured handler.
///
/// # Errors
///
/// [`LLMError::InvalidConfig`] on duplicate handles, otherwise construction failures.
pub fn build_registry(
    configs: &[HandlerConfig],
    context: &HandlerContext,
) -> Result<HandlerRegistry, LLMError> {
    let mut builder = HandlerRegistry::builder();
    let mut seen = std::collections::HashSet::new();

    for config in configs {
        if !seen.insert(config.handle.as_str()) {
            return Err(LLMError::invalid_config(
                "handlers.handle",
                format!("duplicate handle `{}`", config.handle),
            ));
        }
        builder = builder.register_handle(config.handle.clone(), build_handler(config, context)?);
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::StaticCredentials;
    use crate::http::{HttpRequest, HttpResponse, HttpTransport};
    use async_trait::async_trait;

    struct UnusedTransport;

    #[async_trait]
    impl HttpTransport for UnusedTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, LLMError> {
            panic!("send should not be called");
        }
    }

    fn context() -> HandlerContext {
        HandlerContext::new(Arc::new(UnusedTransport), Arc::new(StaticCredentials::new()))
    }

    const SAMPLE: &str = r#"
[logging]
log_dir = "var/log/handlers"
handler_level = "info"

[[handlers]]
handle = "default-openai"
kind = "openai"

[[handlers]]
handle = "long-context"
kind = "anthropic"
model = "claude-3-5-haiku-latest"

[[handlers]]
handle = "reasoning"
kind = "groq"
model = "deepseek-r1-distill-llama-70b"
base_url = "http://localhost:9000/openai"
"#;

    #[test]
    fn parses_logging_and_handlers() {
        let config = AppConfig::from_toml_str(SAMPLE).expect("config");
        assert_eq!(
            config.logging.log_dir.as_deref(),
            Some(Path::new("var/log/handlers"))
        );
        assert_eq!(config.logging.handler_level, "info");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.handlers.len(), 3);
        assert_eq!(config.handlers[0].kind, HandlerKind::OpenAi);
        assert_eq!(config.handlers[0].model, None);
        assert_eq!(
            config.handlers[2].base_url.as_deref(),
            Some("http://localhost:9000/openai")
        );
    }

    #[test]
    fn build_registry_applies_model_overrides() {
        let config = AppConfig::from_toml_str(SAMPLE).expect("config");
        let registry = build_registry(&config.handlers, &context()).expect("registry");

        let mut handles = registry.handles();
        handles.sort();
        assert_eq!(
            handles,
            vec![
                "default-openai".to_string(),
                "long-context".to_string(),
                "reasoning".to_string(),
            ]
        );

        let openai = registry.get("default-openai").expect("openai");
        assert_eq!(openai.name(), "openai");
        assert_eq!(openai.model(), OpenAiHandler::DEFAULT_MODEL);

        let anthropic = registry.get("long-context").expect("anthropic");
        assert_eq!(anthropic.model(), "claude-3-5-haiku-latest");

        let groq = registry.get("reasoning").expect("groq");
        assert_eq!(groq.name(), "groq");
        assert_eq!(groq.model(), "deepseek-r1-distill-llama-70b");
    }

    #[test]
    fn duplicate_handles_are_rejected() {
        let configs = vec![
            HandlerConfig {
                handle: "same".to_string(),
                kind: HandlerKind::Groq,
                model: None,
                base_url: None,
            },
            HandlerConfig {
                handle: "same".to_string(),
                kind: HandlerKind::OpenAi,
                model: None,
                base_url: None,
            },
        ];

        match build_registry(&configs, &context()) {
            Err(LLMError::InvalidConfig { reason, .. }) => {
                assert!(reason.contains("same"), "unexpected reason: {reason}");
            }
            Err(other) => panic!("unexpected error type: {other:?}"),
            Ok(_) => panic!("expected duplicate handle to be rejected"),
        }
    }

    #[test]
    fn unknown_kind_is_invalid_config() {
        let err = AppConfig::from_toml_str("[[handlers]]\nhandle = \"x\"\nkind = \"mistral\"\n")
            .expect_err("should fail");
        assert!(matches!(err, LLMError::InvalidConfig { .. }));
        assert!("Mistral".parse::<HandlerKind>().is_err());
        assert_eq!("GROQ".parse::<HandlerKind>().expect("kind"), HandlerKind::Groq);
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("handlers.toml");
        std::fs::write(&path, SAMPLE).expect("write");
        let config = AppConfig::from_file(&path).expect("config");
        assert_eq!(config.handlers.len(), 3);

        let missing = AppConfig::from_file(dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(LLMError::InvalidConfig { .. })));
    }
}
