//! `relaybot onboard` — initialize configuration.
//!
//! Creates `~/.relaybot/config.json` with defaults and prints which
//! credentials still need to be filled in.

use anyhow::Result;
use colored::Colorize;

use relaybot_core::config::{get_config_path, load_config, save_config};

/// Run the onboard command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "🦀 Relaybot — Setup".cyan().bold());
    println!();

    let config_path = get_config_path();

    // Create config if it doesn't exist
    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        let config = load_config(None); // defaults + any env vars already set
        save_config(&config, Some(&config_path))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    let config = load_config(None);

    println!();
    if !config.slack.is_configured() || !config.providers.openai.is_configured() {
        println!("  Still needed before the relay can run:");
        if config.slack.signing_secret.is_empty() {
            println!("    - slack.signingSecret (or SLACK_SIGNING_SECRET)");
        }
        if config.slack.bot_token.is_empty() {
            println!("    - slack.botToken (or SLACK_BOT_TOKEN)");
        }
        if !config.providers.openai.is_configured() {
            println!("    - providers.openai.apiKey (or OPENAI_API_KEY)");
        }
        println!();
        println!("  Then point your Slack app's Events API at POST /slack/events.");
    } else {
        println!(
            "{}",
            "  Setup complete! Run `relaybot serve` to start the gateway.".green()
        );
    }
    println!();

    Ok(())
}
