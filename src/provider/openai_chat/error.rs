use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{LLMError, extract_model_identifier, looks_like_token_limit_error};

/// Parses error responses returned by OpenAI-compatible Chat Completions endpoints.
pub(crate) fn parse_openai_error(
    provider: &'static str,
    status: u16,
    body: &str,
    retry_after: Option<Duration>,
) -> LLMError {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<InnerError>,
    }
    #[derive(Deserialize)]
    struct InnerError {
        message: Option<String>,
        #[allow(dead_code)]
        r#type: Option<String>,
        code: Option<Value>,
    }

    if let Ok(ErrorBody { error: Some(error) }) = serde_json::from_str::<ErrorBody>(body) {
        let mut message = error.message.unwrap_or_else(|| "unknown error".to_string());
        let code_string = match error.code {
            Some(Value::String(code)) => Some(code),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        if let Some(code) = &code_string {
            message = format!("{message} ({code})");
        }
        let code_hint = code_string.as_deref();

        if looks_like_token_limit_error(code_hint, &message) {
            return LLMError::TokenLimitExceeded { message };
        }

        if status == 404 || matches!(code_hint, Some("model_not_found")) {
            return LLMError::ModelNotFound {
                model: extract_model_identifier(&message),
                message,
            };
        }

        return match status {
            401 | 403 => LLMError::Auth { message },
            429 => LLMError::RateLimit {
                message,
                retry_after,
            },
            400 | 422 => LLMError::Validation { message },
            _ => LLMError::Provider { provider, message },
        };
    }

    match status {
        401 | 403 => LLMError::Auth {
            message: format!("status {status}: {body}"),
        },
        _ => LLMError::Provider {
            provider,
            message: format!("status {status}: {body}"),
        },
    }
}
