//! Configuration schema — typed settings for the relay.
//!
//! Hierarchy: `Config` → `AgentConfig`, `ProvidersConfig`, `SlackConfig`,
//! `GatewayConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.relaybot/config.json` + env vars.
///
/// Constructed once at startup and passed explicitly into the verifier,
/// the provider, and the Slack client. Immutable thereafter.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub agent: AgentConfig,
    pub providers: ProvidersConfig,
    pub slack: SlackConfig,
    pub gateway: GatewayConfig,
}

// ─────────────────────────────────────────────
// Agent
// ─────────────────────────────────────────────

/// Reply-generation settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    /// LLM model identifier.
    pub model: String,
    /// System prompt prepended to every completion request.
    pub system_prompt: String,
    /// Maximum tokens to generate per reply.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            system_prompt: "You are a kind and knowledgeable assistant. \
                            Answer politely and concisely."
                .to_string(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Configuration for a single LLM provider (API key, base URL).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for authentication.
    #[serde(default)]
    pub api_key: String,
    /// Custom API base URL (overrides the provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ProviderConfig {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// All provider configurations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderConfig,
}

// ─────────────────────────────────────────────
// Slack
// ─────────────────────────────────────────────

/// Slack workspace credentials and webhook settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlackConfig {
    /// Signing secret used to verify inbound webhook requests.
    #[serde(default)]
    pub signing_secret: String,
    /// Bot token (`xoxb-...`) for the Web API.
    #[serde(default)]
    pub bot_token: String,
    /// Custom Web API base URL (overrides `https://slack.com/api`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl SlackConfig {
    /// Whether both credentials needed to relay messages are present.
    pub fn is_configured(&self) -> bool {
        !self.signing_secret.is_empty() && !self.bot_token.is_empty()
    }
}

// ─────────────────────────────────────────────
// Gateway
// ─────────────────────────────────────────────

/// HTTP gateway configuration (the inbound webhook listener).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
