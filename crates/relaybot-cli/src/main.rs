//! Relaybot CLI — entry point.
//!
//! # Commands
//!
//! - `relaybot serve` — run the webhook gateway + relay loop
//! - `relaybot onboard` — initialize configuration
//! - `relaybot status` — show configuration and credential status

mod helpers;
mod onboard;
mod serve;
mod status;

use anyhow::Result;
use clap::{Parser, Subcommand};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🦀 Relaybot — Slack → LLM webhook relay in Rust
#[derive(Parser)]
#[command(name = "relaybot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook gateway (HTTP server + relay loop)
    Serve {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Initialize configuration
    Onboard,

    /// Show configuration and credential status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { logs } => {
            init_logging(logs);
            serve::run().await
        }
        Commands::Onboard => onboard::run(),
        Commands::Status => status::run(),
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("relaybot=debug,info")
    } else {
        EnvFilter::new("relaybot=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
