//! OpenAI-compatible Chat Completions client, shared by OpenAI and Groq.

mod error;
mod provider;
mod response;
mod types;

pub use provider::{GROQ_BASE_URL, OPENAI_BASE_URL, OpenAiChatClient};
pub use types::{
    ChatCompletionChoice, ChatCompletionMessage, ChatCompletionRequest, ChatCompletionResponse,
    ChatCompletionUsage, ChatMessage,
};
