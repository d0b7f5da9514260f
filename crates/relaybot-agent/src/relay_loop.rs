//! Relay loop — verified event in, LLM reply out.
//!
//! The webhook has already acknowledged Slack by the time an event reaches
//! this loop, so nothing here is on the request path. Replies are best
//! effort, at most once: a provider failure is logged and the event is
//! dropped — the user sees the bot simply not replying, never an error.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use relaybot_core::bus::queue::MessageBus;
use relaybot_core::bus::types::{InboundEvent, OutboundReply};
use relaybot_core::types::Message;
use relaybot_providers::traits::{LlmProvider, LlmRequestConfig};

// ─────────────────────────────────────────────
// RelayLoop
// ─────────────────────────────────────────────

/// The reply orchestrator: polls the bus, calls the LLM, publishes replies.
pub struct RelayLoop {
    /// Message bus for inbound events and outbound replies.
    bus: Arc<MessageBus>,
    /// LLM provider.
    provider: Arc<dyn LlmProvider>,
    /// Model to use (overrides provider default if set).
    model: String,
    /// System prompt prepended to every completion request.
    system_prompt: String,
    /// LLM request config (temperature, max_tokens).
    request_config: LlmRequestConfig,
}

impl RelayLoop {
    /// Create a new relay loop.
    pub fn new(
        bus: Arc<MessageBus>,
        provider: Arc<dyn LlmProvider>,
        model: Option<String>,
        system_prompt: impl Into<String>,
        request_config: Option<LlmRequestConfig>,
    ) -> Self {
        let model = model.unwrap_or_else(|| provider.default_model().to_string());

        info!(
            model = %model,
            provider = provider.display_name(),
            "relay loop initialized"
        );

        Self {
            bus,
            provider,
            model,
            system_prompt: system_prompt.into(),
            request_config: request_config.unwrap_or_default(),
        }
    }

    /// Run the event loop: poll inbound events and process them.
    ///
    /// This runs indefinitely until the inbound queue is closed.
    pub async fn run(&self) {
        info!("relay loop started, waiting for events");
        loop {
            match self.bus.consume_inbound().await {
                Some(event) => {
                    debug!(
                        channel_id = %event.channel_id,
                        user_id = %event.user_id,
                        "processing event"
                    );

                    match self.process(&event).await {
                        Ok(Some(reply)) => {
                            if let Err(e) = self.bus.publish_outbound(reply).await {
                                error!(error = %e, "failed to publish reply");
                            }
                        }
                        Ok(None) => {
                            debug!(channel_id = %event.channel_id, "no reply produced");
                        }
                        Err(e) => {
                            // At most once, no retry: the user just sees no reply
                            error!(
                                channel_id = %event.channel_id,
                                error = %e,
                                "reply generation failed"
                            );
                        }
                    }
                }
                None => {
                    info!("inbound queue closed, relay loop exiting");
                    break;
                }
            }
        }
    }

    /// Generate a reply for a single event.
    async fn process(&self, event: &InboundEvent) -> Result<Option<OutboundReply>> {
        let messages = vec![
            Message::system(&self.system_prompt),
            Message::user(&event.text),
        ];

        let response = self
            .provider
            .chat(&messages, &self.model, &self.request_config)
            .await?;

        let Some(content) = response.content else {
            warn!(channel_id = %event.channel_id, "provider returned no content");
            return Ok(None);
        };

        let mut reply = OutboundReply::new(&event.channel_id, content);
        if let Some(thread_ts) = event.reply_thread() {
            reply = reply.in_thread(thread_ts);
        }
        Ok(Some(reply))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
