//! LLM client for generating assistant replies
//!
//! Talks to an OpenAI-compatible chat-completions endpoint (the Gemini API
//! exposes one). The store never calls this crate; it only persists the
//! reply strings handed back to the routing layer.

mod ai_types;
mod client;
mod error;
#[cfg(test)]
mod retry_tests;

pub use client::{DEFAULT_MODEL, LlmClient};
pub use error::LlmError;
