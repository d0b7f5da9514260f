//! Outbound reply dispatcher — drains the bus into the Slack Web API.
//!
//! Delivery is at most once: a failed post is logged and dropped, never
//! retried. Slack already received its 200 for the triggering event, so
//! nothing here can cause a redelivery.

use std::sync::Arc;

use tokio::sync::Notify;
use tracing::{debug, error, info};

use relaybot_core::bus::queue::MessageBus;

use crate::api::SlackClient;

/// Consumes outbound replies from the bus and posts them to Slack.
pub struct ReplyDispatcher {
    client: Arc<SlackClient>,
    bus: Arc<MessageBus>,
    shutdown: Arc<Notify>,
}

impl ReplyDispatcher {
    /// Create a new dispatcher.
    pub fn new(client: Arc<SlackClient>, bus: Arc<MessageBus>) -> Self {
        Self {
            client,
            bus,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Run until shutdown is signaled or the outbound queue closes.
    pub async fn run(&self) {
        info!("reply dispatcher started");

        loop {
            tokio::select! {
                reply = self.bus.consume_outbound() => {
                    match reply {
                        Some(reply) => {
                            debug!(
                                channel_id = %reply.channel_id,
                                text_len = reply.text.len(),
                                "delivering reply"
                            );

                            if let Err(e) = self.client.post_reply(&reply).await {
                                error!(
                                    channel_id = %reply.channel_id,
                                    error = %e,
                                    "failed to deliver reply"
                                );
                            }
                        }
                        None => {
                            info!("outbound queue closed, dispatcher exiting");
                            break;
                        }
                    }
                }
                _ = self.shutdown.notified() => {
                    info!("reply dispatcher received shutdown signal");
                    break;
                }
            }
        }
    }

    /// Signal the dispatcher to shut down.
    pub fn stop(&self) {
        self.shutdown.notify_waiters();
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use relaybot_core::bus::types::OutboundReply;
    use relaybot_core::config::schema::SlackConfig;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(api_base: &str) -> Arc<SlackClient> {
        Arc::new(SlackClient::new(&SlackConfig {
            signing_secret: "secret".into(),
            bot_token: "xoxb-test".into(),
            api_base: Some(api_base.to_string()),
        }))
    }

    #[tokio::test]
    async fn test_dispatches_reply_to_slack() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .and(body_partial_json(serde_json::json!({
                "channel": "C123",
                "text": "the answer"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let bus = Arc::new(MessageBus::new(10));
        let dispatcher = Arc::new(ReplyDispatcher::new(make_client(&mock_server.uri()), bus.clone()));

        let d = dispatcher.clone();
        let handle = tokio::spawn(async move { d.run().await });

        bus.publish_outbound(OutboundReply::new("C123", "the answer"))
            .await
            .unwrap();

        // Give the dispatcher time to deliver
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        dispatcher.stop();
        let _ = handle.await;
        // expectation of exactly 1 post checked on mock server drop
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_stop_dispatcher() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": false,
                "error": "channel_not_found"
            })))
            .expect(2)
            .mount(&mock_server)
            .await;

        let bus = Arc::new(MessageBus::new(10));
        let dispatcher = Arc::new(ReplyDispatcher::new(make_client(&mock_server.uri()), bus.clone()));

        let d = dispatcher.clone();
        let handle = tokio::spawn(async move { d.run().await });

        // Two replies; the first fails, the second must still be attempted
        bus.publish_outbound(OutboundReply::new("C404", "first"))
            .await
            .unwrap();
        bus.publish_outbound(OutboundReply::new("C404", "second"))
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        dispatcher.stop();
        let _ = handle.await;
    }

    #[tokio::test]
    async fn test_stop_without_messages() {
        let mock_server = MockServer::start().await;
        let bus = Arc::new(MessageBus::new(10));
        let dispatcher = Arc::new(ReplyDispatcher::new(make_client(&mock_server.uri()), bus));

        let d = dispatcher.clone();
        let handle = tokio::spawn(async move { d.run().await });

        // Let the run loop reach its select before signaling
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        dispatcher.stop();

        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .expect("dispatcher should exit on stop")
            .unwrap();
    }
}
