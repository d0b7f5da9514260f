//! Async message bus — connects the webhook handler to the relay loop.
//!
//! Built on tokio::sync::mpsc bounded channels. The webhook publishes a
//! verified event and returns 200 without waiting; the relay loop consumes
//! it, and the reply dispatcher consumes the resulting outbound reply.

use super::types::{InboundEvent, OutboundReply};
use tokio::sync::mpsc;

/// The message bus connecting webhook → relay loop → reply dispatcher.
///
/// - The webhook handler publishes to `inbound` (verified events arriving)
/// - The relay loop consumes from `inbound`, calls the LLM, publishes to `outbound`
/// - The reply dispatcher consumes from `outbound` and posts to Slack
pub struct MessageBus {
    inbound_tx: mpsc::Sender<InboundEvent>,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    outbound_tx: mpsc::Sender<OutboundReply>,
    outbound_rx: tokio::sync::Mutex<mpsc::Receiver<OutboundReply>>,
}

impl MessageBus {
    /// Create a new message bus with the given buffer capacity.
    pub fn new(buffer_size: usize) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel(buffer_size);
        let (outbound_tx, outbound_rx) = mpsc::channel(buffer_size);

        MessageBus {
            inbound_tx,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            outbound_tx,
            outbound_rx: tokio::sync::Mutex::new(outbound_rx),
        }
    }

    /// Publish a verified event from the webhook to the relay loop.
    pub async fn publish_inbound(
        &self,
        event: InboundEvent,
    ) -> Result<(), mpsc::error::SendError<InboundEvent>> {
        self.inbound_tx.send(event).await
    }

    /// Consume the next inbound event (blocks until available).
    /// Returns None if all senders are dropped.
    pub async fn consume_inbound(&self) -> Option<InboundEvent> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await
    }

    /// Publish a reply from the relay loop to the dispatcher.
    pub async fn publish_outbound(
        &self,
        reply: OutboundReply,
    ) -> Result<(), mpsc::error::SendError<OutboundReply>> {
        self.outbound_tx.send(reply).await
    }

    /// Consume the next outbound reply (blocks until available).
    /// Returns None if all senders are dropped.
    pub async fn consume_outbound(&self) -> Option<OutboundReply> {
        let mut rx = self.outbound_rx.lock().await;
        rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inbound_event_flow() {
        let bus = MessageBus::new(10);

        let event = InboundEvent::new("C123", "U1", "Hello!", "1.0001");
        bus.publish_inbound(event).await.unwrap();

        let received = bus.consume_inbound().await.unwrap();
        assert_eq!(received.channel_id, "C123");
        assert_eq!(received.text, "Hello!");
    }

    #[tokio::test]
    async fn test_outbound_reply_flow() {
        let bus = MessageBus::new(10);

        let reply = OutboundReply::new("C42", "Response here");
        bus.publish_outbound(reply).await.unwrap();

        let received = bus.consume_outbound().await.unwrap();
        assert_eq!(received.channel_id, "C42");
        assert_eq!(received.text, "Response here");
    }

    #[tokio::test]
    async fn test_event_ordering() {
        let bus = MessageBus::new(10);

        // Publish 3 events
        for i in 1..=3 {
            let event = InboundEvent::new("C1", "U1", format!("msg-{}", i), "1.0");
            bus.publish_inbound(event).await.unwrap();
        }

        // Consume in order
        let m1 = bus.consume_inbound().await.unwrap();
        let m2 = bus.consume_inbound().await.unwrap();
        let m3 = bus.consume_inbound().await.unwrap();

        assert_eq!(m1.text, "msg-1");
        assert_eq!(m2.text, "msg-2");
        assert_eq!(m3.text, "msg-3");
    }

    #[tokio::test]
    async fn test_concurrent_producers() {
        let bus = std::sync::Arc::new(MessageBus::new(10));

        // Simulate two webhook requests publishing concurrently
        let bus1 = bus.clone();
        let bus2 = bus.clone();

        let h1 = tokio::spawn(async move {
            let event = InboundEvent::new("C1", "U1", "from first request", "1.0");
            bus1.publish_inbound(event).await.unwrap();
        });

        let h2 = tokio::spawn(async move {
            let event = InboundEvent::new("C2", "U2", "from second request", "2.0");
            bus2.publish_inbound(event).await.unwrap();
        });

        h1.await.unwrap();
        h2.await.unwrap();

        // Both events should be in the queue
        let r1 = bus.consume_inbound().await.unwrap();
        let r2 = bus.consume_inbound().await.unwrap();

        let channels: Vec<&str> = vec![r1.channel_id.as_str(), r2.channel_id.as_str()];
        assert!(channels.contains(&"C1"));
        assert!(channels.contains(&"C2"));
    }

    #[tokio::test]
    async fn test_full_round_trip() {
        // Simulate: webhook → bus → relay loop → bus → dispatcher
        let bus = std::sync::Arc::new(MessageBus::new(10));

        // 1. Webhook publishes a verified event
        let event = InboundEvent::new("C99", "U42", "What is 2+2?", "1700000000.000100");
        bus.publish_inbound(event).await.unwrap();

        // 2. Relay loop consumes it
        let received = bus.consume_inbound().await.unwrap();
        assert_eq!(received.text, "What is 2+2?");

        // 3. Relay loop processes and publishes a reply
        let reply = OutboundReply::new(received.channel_id.clone(), "The answer is 4.");
        bus.publish_outbound(reply).await.unwrap();

        // 4. Dispatcher consumes the reply
        let outbound = bus.consume_outbound().await.unwrap();
        assert_eq!(outbound.channel_id, "C99");
        assert_eq!(outbound.text, "The answer is 4.");
    }
}
