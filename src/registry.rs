use std::collections::HashMap;

use crate::error::LLMError;
use crate::handler::DynModelHandler;

/// Named handlers, looked up per call.
pub struct HandlerRegistry {
    handlers: HashMap<String, DynModelHandler>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder {
            handlers: HashMap::new(),
        }
    }

    /// Generates text with the handler registered under `handle`.
    ///
    /// # Errors
    ///
    /// [`LLMError::Validation`] for an unknown handle, otherwise whatever the handler
    /// returns.
    pub async fn generate_text(&self, handle: &str, prompt: &str) -> Result<String, LLMError> {
        let handler = self.get(handle)?;
        handler.generate_text(prompt).await
    }

    /// Currently registered handles, in no particular order.
    pub fn handles(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    /// # Errors
    ///
    /// [`LLMError::Validation`] when `handle` is not registered.
    pub fn get(&self, handle: &str) -> Result<DynModelHandler, LLMError> {
        self.handlers
            .get(handle)
            .cloned()
            .ok_or_else(|| LLMError::Validation {
                message: format!("unknown model handle: {handle}"),
            })
    }
}

pub struct HandlerRegistryBuilder {
    handlers: HashMap<String, DynModelHandler>,
}

impl HandlerRegistryBuilder {
    /// Registers `handler` under `handle`, replacing any previous entry.
    pub fn register_handle<S: Into<String>>(mut self, handle: S, handler: DynModelHandler) -> Self {
        self.handlers.insert(handle.into(), handler);
        self
    }

    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            handlers: self.handlers,
        }
    }
}
