//! Bus event types — messages flowing between the webhook handler and the relay loop.
//!
//! An [`InboundEvent`] is only ever constructed from a request that passed
//! signature verification; it lives until the reply is posted (or dropped),
//! never longer.

use chrono::{DateTime, Utc};

/// A verified conversational event handed off by the webhook for relaying.
#[derive(Clone, Debug)]
pub struct InboundEvent {
    /// Slack channel the message arrived in (`C…` for channels, `D…` for DMs).
    pub channel_id: String,
    /// Slack user id of the sender.
    pub user_id: String,
    /// Message text with bot mentions already stripped.
    pub text: String,
    /// Timestamp of the triggering message (used as the reply thread anchor).
    pub ts: String,
    /// Thread the message belongs to, if it was already in one.
    pub thread_ts: Option<String>,
    /// Whether this came in as a direct message (`channel_type == "im"`).
    pub is_direct_message: bool,
    /// When the webhook accepted the event.
    pub received_at: DateTime<Utc>,
}

impl InboundEvent {
    /// Create a new inbound event with minimal required fields.
    pub fn new(
        channel_id: impl Into<String>,
        user_id: impl Into<String>,
        text: impl Into<String>,
        ts: impl Into<String>,
    ) -> Self {
        InboundEvent {
            channel_id: channel_id.into(),
            user_id: user_id.into(),
            text: text.into(),
            ts: ts.into(),
            thread_ts: None,
            is_direct_message: false,
            received_at: Utc::now(),
        }
    }

    /// The thread a reply should be anchored to: the existing thread if the
    /// message was already in one, otherwise the message itself. DMs reply
    /// in-channel without a thread, as do events with no message timestamp
    /// (slash commands).
    pub fn reply_thread(&self) -> Option<String> {
        if self.is_direct_message {
            return None;
        }
        match &self.thread_ts {
            Some(ts) => Some(ts.clone()),
            None if self.ts.is_empty() => None,
            None => Some(self.ts.clone()),
        }
    }
}

/// A reply from the relay loop, bound for a Slack channel.
#[derive(Clone, Debug)]
pub struct OutboundReply {
    /// Target Slack channel id.
    pub channel_id: String,
    /// Reply text.
    pub text: String,
    /// Thread to post into, if any.
    pub thread_ts: Option<String>,
}

impl OutboundReply {
    /// Create a new outbound reply.
    pub fn new(channel_id: impl Into<String>, text: impl Into<String>) -> Self {
        OutboundReply {
            channel_id: channel_id.into(),
            text: text.into(),
            thread_ts: None,
        }
    }

    /// Anchor the reply to a thread.
    pub fn in_thread(mut self, thread_ts: impl Into<String>) -> Self {
        self.thread_ts = Some(thread_ts.into());
        self
    }
}
