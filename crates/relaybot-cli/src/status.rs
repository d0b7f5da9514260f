//! `relaybot status` — show configuration and credential status.

use anyhow::Result;
use colored::Colorize;

use relaybot_core::config::{get_config_path, load_config};

use crate::helpers::credential_status;

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "🦀 Relaybot Status".cyan().bold());
    println!();

    // Config
    let config_exists = config_path.exists();
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_exists {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    // Model
    println!("  {:<18} {}", "Model:".bold(), config.agent.model);

    // Parameters
    println!(
        "  {:<18} {} | max_tokens: {}",
        "Parameters:".bold(),
        format!("temp: {}", config.agent.temperature).dimmed(),
        format!("{}", config.agent.max_tokens).dimmed(),
    );

    // Gateway
    println!(
        "  {:<18} {}:{}",
        "Gateway:".bold(),
        config.gateway.host,
        config.gateway.port
    );

    // Credentials
    println!();
    println!("  {}", "Credentials:".bold());
    println!(
        "    {:<20} {}",
        "Slack signing secret",
        credential_status(!config.slack.signing_secret.is_empty())
    );
    println!(
        "    {:<20} {}",
        "Slack bot token",
        credential_status(!config.slack.bot_token.is_empty())
    );
    println!(
        "    {:<20} {}",
        "OpenAI API key",
        credential_status(config.providers.openai.is_configured())
    );

    println!();

    Ok(())
}
