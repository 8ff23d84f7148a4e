//! Credential lookup for provider handlers.

use std::collections::HashMap;
use std::fmt;

/// Secret API key scoped to one provider.
///
/// The `Debug` output is redacted so keys never reach log lines or panic messages.
///
/// # Examples
///
/// ```
/// use model_handler::credential::ApiKey;
///
/// let key = ApiKey::new("sk-live-123");
/// assert_eq!(format!("{key:?}"), "ApiKey(***)");
/// assert_eq!(key.expose(), "sk-live-123");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the raw secret for use in an auth header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Source of provider credentials, keyed by well-known variable name.
///
/// Handlers ask for their variable once at construction. Returning `None` is not an
/// error: the provider rejects the first call instead.
pub trait CredentialSource: Send + Sync {
    fn lookup(&self, name: &str) -> Option<ApiKey>;
}

/// Reads credentials from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn lookup(&self, name: &str) -> Option<ApiKey> {
        std::env::var(name)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(ApiKey::new)
    }
}

/// Fixed in-memory credentials, mostly for tests and embedding.
#[derive(Clone, Default)]
pub struct StaticCredentials {
    keys: HashMap<String, ApiKey>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, key: impl Into<String>) -> Self {
        self.keys.insert(name.into(), ApiKey::new(key));
        self
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("names", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CredentialSource for StaticCredentials {
    fn lookup(&self, name: &str) -> Option<ApiKey> {
        self.keys.get(name).cloned()
    }
}
