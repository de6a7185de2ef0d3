//! LLM provider trait definition.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Options for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl CompletionOptions {
    /// Low temperature, for replies that must follow a strict format.
    pub fn deterministic(timeout: Duration) -> Self {
        Self {
            temperature: 0.0,
            max_tokens: Some(256),
            timeout,
        }
    }
}

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,

    #[error("No LLM provider configured")]
    NotConfigured,
}

/// A text-in, text-out language model.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider's name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Get the model being used.
    fn model(&self) -> &str;

    /// Send a single prompt and return the model's text reply.
    async fn complete(&self, prompt: &str, options: &CompletionOptions)
        -> Result<String, LlmError>;
}

/// Used when no API key is configured. Every completion fails, so callers
/// take their fallback path.
pub struct NoOpLlmProvider;

#[async_trait]
impl LlmProvider for NoOpLlmProvider {
    fn name(&self) -> &str {
        "noop"
    }

    fn model(&self) -> &str {
        "none"
    }

    async fn complete(
        &self,
        _prompt: &str,
        _options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        Err(LlmError::NotConfigured)
    }
}
