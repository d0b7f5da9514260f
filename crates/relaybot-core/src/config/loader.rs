//! Config loader — reads `~/.relaybot/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.relaybot/config.json`
//! 3. Environment variables `RELAYBOT_<SECTION>__<FIELD>` (override JSON)
//! 4. Plain secret variables (`SLACK_SIGNING_SECRET`, `SLACK_BOT_TOKEN`,
//!    `OPENAI_API_KEY`, `PORT`) as fallbacks when nothing else set them

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    // Ensure parent directory exists
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `RELAYBOT_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `RELAYBOT_AGENT__MODEL` → `agent.model`
/// - `RELAYBOT_AGENT__SYSTEM_PROMPT` → `agent.system_prompt`
/// - `RELAYBOT_AGENT__MAX_TOKENS` → `agent.max_tokens`
/// - `RELAYBOT_AGENT__TEMPERATURE` → `agent.temperature`
/// - `RELAYBOT_PROVIDERS__OPENAI__API_KEY` → `providers.openai.api_key`
/// - `RELAYBOT_PROVIDERS__OPENAI__API_BASE` → `providers.openai.api_base`
/// - `RELAYBOT_SLACK__SIGNING_SECRET` → `slack.signing_secret`
/// - `RELAYBOT_SLACK__BOT_TOKEN` → `slack.bot_token`
/// - `RELAYBOT_GATEWAY__HOST` → `gateway.host`
/// - `RELAYBOT_GATEWAY__PORT` → `gateway.port`
///
/// The conventional deployment variables `SLACK_SIGNING_SECRET`,
/// `SLACK_BOT_TOKEN`, `OPENAI_API_KEY`, and `PORT` are honored as fallbacks
/// when the corresponding field is still unset.
fn apply_env_overrides(mut config: Config) -> Config {
    // Agent
    if let Ok(val) = std::env::var("RELAYBOT_AGENT__MODEL") {
        config.agent.model = val;
    }
    if let Ok(val) = std::env::var("RELAYBOT_AGENT__SYSTEM_PROMPT") {
        config.agent.system_prompt = val;
    }
    if let Ok(val) = std::env::var("RELAYBOT_AGENT__MAX_TOKENS") {
        if let Ok(n) = val.parse::<u32>() {
            config.agent.max_tokens = n;
        }
    }
    if let Ok(val) = std::env::var("RELAYBOT_AGENT__TEMPERATURE") {
        if let Ok(t) = val.parse::<f64>() {
            config.agent.temperature = t;
        }
    }

    // OpenAI provider
    if let Ok(val) = std::env::var("RELAYBOT_PROVIDERS__OPENAI__API_KEY") {
        config.providers.openai.api_key = val;
    }
    if let Ok(val) = std::env::var("RELAYBOT_PROVIDERS__OPENAI__API_BASE") {
        config.providers.openai.api_base = Some(val);
    }

    // Slack
    if let Ok(val) = std::env::var("RELAYBOT_SLACK__SIGNING_SECRET") {
        config.slack.signing_secret = val;
    }
    if let Ok(val) = std::env::var("RELAYBOT_SLACK__BOT_TOKEN") {
        config.slack.bot_token = val;
    }

    // Gateway
    if let Ok(val) = std::env::var("RELAYBOT_GATEWAY__HOST") {
        config.gateway.host = val;
    }
    if let Ok(val) = std::env::var("RELAYBOT_GATEWAY__PORT") {
        if let Ok(p) = val.parse::<u16>() {
            config.gateway.port = p;
        }
    }

    apply_plain_env_fallbacks(config)
}

/// Honor the conventional deployment variable names when a field is still empty.
fn apply_plain_env_fallbacks(mut config: Config) -> Config {
    if config.slack.signing_secret.is_empty() {
        if let Ok(val) = std::env::var("SLACK_SIGNING_SECRET") {
            config.slack.signing_secret = val;
        }
    }
    if config.slack.bot_token.is_empty() {
        if let Ok(val) = std::env::var("SLACK_BOT_TOKEN") {
            config.slack.bot_token = val;
        }
    }
    if config.providers.openai.api_key.is_empty() {
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            config.providers.openai.api_key = val;
        }
    }
    if let Ok(val) = std::env::var("PORT") {
        if let Ok(p) = val.parse::<u16>() {
            config.gateway.port = p;
        }
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        // Should return defaults
        assert_eq!(config.agent.model, "gpt-4o-mini");
        assert_eq!(config.agent.max_tokens, 1000);
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
            "agent": {
                "model": "gpt-4o",
                "maxTokens": 2048
            }
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert_eq!(config.agent.model, "gpt-4o");
        assert_eq!(config.agent.max_tokens, 2048);
        // Default preserved
        assert_eq!(config.agent.temperature, 0.7);
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config.agent.max_tokens, 1000);
    }

    #[test]
    fn test_load_empty_json() {
        let file = write_temp_json("{}");
        let config = load_config_from_path(file.path());
        assert_eq!(config.agent.model, "gpt-4o-mini");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.agent.model = "gpt-4.1".to_string();
        config.slack.signing_secret = "shhh".to_string();

        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config_from_path(&path);
        assert_eq!(reloaded.agent.model, "gpt-4.1");
        assert_eq!(reloaded.slack.signing_secret, "shhh");
    }

    #[test]
    fn test_env_override_model() {
        std::env::set_var("RELAYBOT_AGENT__MODEL", "test-model");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.agent.model, "test-model");
        std::env::remove_var("RELAYBOT_AGENT__MODEL");
    }

    #[test]
    fn test_env_override_gateway_port() {
        std::env::set_var("RELAYBOT_GATEWAY__PORT", "9999");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.gateway.port, 9999);
        std::env::remove_var("RELAYBOT_GATEWAY__PORT");
    }

    #[test]
    fn test_plain_env_fallback_does_not_override() {
        // A value set via config should win over the plain variable
        std::env::set_var("SLACK_SIGNING_SECRET", "from-plain-env");
        let mut config = Config::default();
        config.slack.signing_secret = "from-config".into();
        let config = apply_plain_env_fallbacks(config);
        assert_eq!(config.slack.signing_secret, "from-config");
        std::env::remove_var("SLACK_SIGNING_SECRET");
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save_config(&Config::default(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(raw["agent"].get("maxTokens").is_some());
        assert!(raw["agent"].get("max_tokens").is_none());
    }

    #[test]
    fn test_full_config_file() {
        let file = write_temp_json(
            r#"{
            "providers": {
                "openai": { "apiKey": "sk-test-123", "apiBase": "https://custom.io/v1" }
            },
            "slack": {
                "signingSecret": "sec",
                "botToken": "xoxb-1"
            },
            "agent": {
                "model": "gpt-4o-mini",
                "temperature": 0.5
            }
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert!(config.providers.openai.is_configured());
        assert_eq!(
            config.providers.openai.api_base.as_deref(),
            Some("https://custom.io/v1")
        );
        assert!(config.slack.is_configured());
        assert_eq!(config.agent.temperature, 0.5);
    }
}
