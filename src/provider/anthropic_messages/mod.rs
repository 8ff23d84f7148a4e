//! Anthropic Messages API client.

mod error;
mod provider;
mod response;
mod types;

pub use provider::{ANTHROPIC_BASE_URL, ANTHROPIC_VERSION, AnthropicMessagesClient};
pub use types::{
    AnthropicContentBlock, AnthropicMessage, AnthropicUsage, MessagesRequest, MessagesResponse,
};
