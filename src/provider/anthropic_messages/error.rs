use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{LLMError, extract_model_identifier, looks_like_token_limit_error};

const PROVIDER: &str = "anthropic_messages";

/// Parses error responses returned by the Anthropic Messages API.
pub(crate) fn parse_anthropic_error(
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
        r#type: Option<String>,
        code: Option<Value>,
    }

    if let Ok(ErrorBody { error: Some(error) }) = serde_json::from_str::<ErrorBody>(body) {
        let mut message = error.message.unwrap_or_else(|| "unknown error".to_string());
        let code_string = error
            .code
            .as_ref()
            .and_then(|value| value.as_str().map(str::to_string))
            .or(error.r#type);
        if let Some(code) = &code_string {
            message = format!("{message} ({code})");
        }
        let code_hint = code_string.as_deref();

        if looks_like_token_limit_error(code_hint, &message) {
            return LLMError::TokenLimitExceeded { message };
        }

        if status == 404 || matches!(code_hint, Some("not_found" | "not_found_error")) {
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
            400 => LLMError::Validation { message },
            _ => LLMError::Provider {
                provider: PROVIDER,
                message,
            },
        };
    }

    // Unparseable payloads surface the raw body.
    LLMError::Provider {
        provider: PROVIDER,
        message: format!("status {status}: {body}"),
    }
}
