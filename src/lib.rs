//! One text-generation contract over several chat-completion providers.

pub mod config;
pub mod credential;
pub mod error;
pub mod handler;
pub mod http;
pub mod logging;
pub mod provider;
pub mod registry;

pub use error::LLMError;
pub use handler::{
    AnthropicHandler, DynModelHandler, GroqHandler, HandlerContext, ModelHandler, OpenAiHandler,
};
pub use registry::HandlerRegistry;
