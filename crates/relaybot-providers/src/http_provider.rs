//! HTTP-based LLM provider for OpenAI-compatible APIs.
//!
//! Talks directly to a `/chat/completions` endpoint via `reqwest`. The
//! default base URL targets OpenAI; any OpenAI-compatible gateway works by
//! overriding `apiBase` in the provider config.

use async_trait::async_trait;
use anyhow::Context;
use tracing::debug;

use relaybot_core::config::schema::ProviderConfig;
use relaybot_core::types::{ChatCompletionRequest, ChatCompletionResponse, LlmResponse, Message};

use crate::traits::{LlmProvider, LlmRequestConfig};

/// Default API base when the config doesn't override it.
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Request timeout for completion calls.
const REQUEST_TIMEOUT_SECS: u64 = 120;

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// An LLM provider that talks to an OpenAI-compatible HTTP API.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Default model for this provider instance.
    default_model: String,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl HttpProvider {
    /// Create a new HttpProvider from a provider config.
    pub fn new(config: &ProviderConfig, model: &str) -> Self {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        HttpProvider {
            client,
            api_base,
            api_key: config.api_key.clone(),
            default_model: model.to_string(),
        }
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    async fn chat(
        &self,
        messages: &[Message],
        model: &str,
        config: &LlmRequestConfig,
    ) -> anyhow::Result<LlmResponse> {
        debug!(
            model = %model,
            messages = messages.len(),
            "calling chat completions API"
        );

        let request_body = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            max_tokens: Some(config.max_tokens),
            temperature: Some(config.temperature),
        };

        let url = self.completions_url();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .context("chat completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            anyhow::bail!("chat completion API error: {} — {}", status, error_text);
        }

        let chat_resp: ChatCompletionResponse = response
            .json()
            .await
            .context("failed to parse chat completion response")?;

        let llm_resp: LlmResponse = chat_resp.into();
        debug!(
            has_content = llm_resp.content.is_some(),
            finish_reason = llm_resp.finish_reason.as_deref().unwrap_or("?"),
            "LLM response received"
        );
        Ok(llm_resp)
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn display_name(&self) -> &str {
        "OpenAI"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
