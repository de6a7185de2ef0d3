//! LLM provider abstraction layer.
//!
//! Mood classification and the assistant only need a prompt-in, text-out
//! model, so the trait stays that small.

mod gemini;
mod provider;

pub use gemini::GeminiProvider;
pub use provider::{CompletionOptions, LlmError, LlmProvider, NoOpLlmProvider};
