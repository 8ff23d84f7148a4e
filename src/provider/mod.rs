//! Wire-level clients for the chat-completion APIs the handlers sit on.
//!
//! Each client issues exactly one HTTP request per call and maps non-2xx responses
//! into [`crate::LLMError`]. There is no retry, batching or streaming here.

pub mod anthropic_messages;
mod headers;
pub mod openai_chat;
