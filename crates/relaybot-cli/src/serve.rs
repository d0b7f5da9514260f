//! `relaybot serve` — orchestrates the webhook gateway, relay loop, and
//! reply dispatcher.
//!
//! Startup sequence:
//! 1. Load config
//! 2. Create message bus
//! 3. Create LLM provider + Slack client, resolve the bot's own user id
//! 4. Build the webhook router
//! 5. Run: `tokio::select!` of HTTP server + relay loop + reply dispatcher
//! 6. Handle Ctrl+C for graceful shutdown

use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use relaybot_agent::RelayLoop;
use relaybot_core::bus::queue::MessageBus;
use relaybot_core::config::load_config;
use relaybot_providers::{HttpProvider, LlmRequestConfig};
use relaybot_slack::webhook::{self, GatewayState};
use relaybot_slack::{EventDispatcher, ReplyDispatcher, SignatureVerifier, SlackClient};

use crate::helpers;

/// Run the gateway — starts the HTTP server, relay loop, and dispatcher.
pub async fn run() -> Result<()> {
    helpers::print_banner();
    println!("  Mode: Gateway");
    println!();

    // 1. Load config
    let config = load_config(None);

    if !config.slack.is_configured() || !config.providers.openai.is_configured() {
        warn!("missing credentials; requests will be rejected until they are set");
        println!("  ⚠  Missing credentials. Set SLACK_SIGNING_SECRET, SLACK_BOT_TOKEN,");
        println!("     and OPENAI_API_KEY (or run `relaybot onboard` and edit the config).");
        println!();
    }

    // 2. Create message bus (shared between webhook, relay loop, dispatcher)
    let bus = Arc::new(MessageBus::new(100));

    // 3. Create LLM provider
    let provider = Arc::new(HttpProvider::new(
        &config.providers.openai,
        &config.agent.model,
    ));

    // 4. Create Slack client + resolve the bot's own user id (best-effort;
    //    mention de-duplication degrades gracefully without it)
    let client = Arc::new(SlackClient::new(&config.slack));
    let bot_user_id = if config.slack.bot_token.is_empty() {
        None
    } else {
        match client.auth_test().await {
            Ok(id) => {
                info!(bot_user_id = %id, "resolved bot user id");
                Some(id)
            }
            Err(e) => {
                warn!(error = %e, "could not resolve bot user id");
                None
            }
        }
    };

    // 5. Build webhook state + router
    let state = Arc::new(GatewayState {
        verifier: SignatureVerifier::new(config.slack.signing_secret.clone()),
        dispatcher: EventDispatcher::new(bot_user_id),
        bus: bus.clone(),
    });
    let app = webhook::router(state);

    // 6. Create the relay loop + reply dispatcher
    let relay = Arc::new(RelayLoop::new(
        bus.clone(),
        provider,
        Some(config.agent.model.clone()),
        config.agent.system_prompt.clone(),
        Some(LlmRequestConfig {
            max_tokens: config.agent.max_tokens,
            temperature: config.agent.temperature,
        }),
    ));
    let replies = Arc::new(ReplyDispatcher::new(client, bus.clone()));

    // 7. Bind the listener
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(
        addr = %addr,
        model = %config.agent.model,
        "gateway starting"
    );

    println!("  Model:     {}", config.agent.model);
    println!("  Listening: http://{}", addr);
    println!("  Events:    POST /slack/events");
    println!("  Commands:  POST /slack/commands");
    println!();
    println!("  Ctrl+C to stop");
    println!();

    // 8. Run everything concurrently; Ctrl+C triggers graceful shutdown
    tokio::select! {
        _ = relay.run() => {
            info!("relay loop exited");
        }
        _ = replies.run() => {
            info!("reply dispatcher exited");
        }
        result = axum::serve(listener, app).into_future() => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!();
            println!("  Shutting down...");
            info!("received Ctrl+C, shutting down");
            replies.stop();
        }
    }

    println!("  Gateway stopped. Goodbye!");
    Ok(())
}
