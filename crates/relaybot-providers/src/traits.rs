//! LLM Provider trait — the seam between the relay loop and the model backend.
//!
//! The production implementation is `HttpProvider` in `http_provider.rs`,
//! which covers any OpenAI-compatible `/chat/completions` endpoint. Tests
//! substitute a mock.

use async_trait::async_trait;
use relaybot_core::types::{LlmResponse, Message};

/// Configuration passed to each LLM call.
#[derive(Clone, Debug)]
pub struct LlmRequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

/// Trait that all LLM providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request.
    ///
    /// # Arguments
    /// * `messages` — Conversation in OpenAI format (system + user for the relay).
    /// * `model`    — Model identifier (e.g. `"gpt-4o-mini"`).
    /// * `config`   — Temperature, max_tokens.
    ///
    /// # Errors
    /// Network failures, non-success API statuses, and unparseable bodies
    /// all propagate as errors; the caller decides whether a reply is sent.
    async fn chat(
        &self,
        messages: &[Message],
        model: &str,
        config: &LlmRequestConfig,
    ) -> anyhow::Result<LlmResponse>;

    /// The default model for this provider instance.
    fn default_model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
