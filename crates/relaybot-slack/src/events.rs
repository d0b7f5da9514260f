//! Slack Events API payloads and dispatch.
//!
//! Payloads are modeled as a tagged union with explicit cases for the
//! URL-verification handshake, `event_callback` with nested `app_mention` /
//! `message`, and catch-all `Unrecognized` variants — unknown event types
//! are acknowledged and dropped instead of failing the request.
//!
//! Dispatch rules:
//! - `url_verification` → echo the challenge verbatim (endpoint-ownership check)
//! - bot-origin events, message subtypes, and non-conversational events → ignore
//! - `app_mention` anywhere, or `message` in a DM → forward to the relay
//!
//! A channel `message` that embeds a bot mention is dropped: Slack delivers
//! the same message again as `app_mention`, and that delivery wins.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use relaybot_core::bus::types::InboundEvent;

// ─────────────────────────────────────────────
// Payload types
// ─────────────────────────────────────────────

/// Top-level Events API envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    /// One-time endpoint-ownership handshake.
    UrlVerification { challenge: String },
    /// The general envelope for all non-handshake deliveries.
    EventCallback { event: CallbackEvent },
    /// Anything else Slack may start sending.
    #[serde(other)]
    Unrecognized,
}

/// The nested event inside an `event_callback`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallbackEvent {
    AppMention(MessageEvent),
    Message(MessageEvent),
    #[serde(other)]
    Unrecognized,
}

/// Fields shared by `app_mention` and `message` events.
///
/// Everything is optional at the parse layer; dispatch fails closed on
/// whatever a forwarded event actually requires.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
    /// `"im"` for direct messages, `"channel"`/`"group"` otherwise.
    #[serde(default)]
    pub channel_type: Option<String>,
    /// Present on edits, joins, bot messages, etc.
    #[serde(default)]
    pub subtype: Option<String>,
    /// Present when the message originated from a bot.
    #[serde(default)]
    pub bot_id: Option<String>,
}

impl MessageEvent {
    fn is_direct_message(&self) -> bool {
        self.channel_type.as_deref() == Some("im")
    }
}

// ─────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────

/// Outcome of dispatching a verified payload.
#[derive(Debug)]
pub enum Dispatch {
    /// Respond with exactly this challenge string, no side effects.
    Handshake(String),
    /// Acknowledge with 200, take no action.
    Ignored(IgnoreReason),
    /// Hand off to the relay loop, acknowledge immediately.
    Forward(InboundEvent),
}

/// Why an event was acknowledged without action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The event originated from a bot (possibly this one).
    BotMessage,
    /// A `message` with a subtype (edit, join, …).
    MessageSubtype,
    /// An event type the relay doesn't handle.
    UnrecognizedEventType,
    /// A channel message that isn't a mention or DM.
    NotConversational,
    /// A channel message embedding a mention — the `app_mention`
    /// delivery of the same message handles it.
    DuplicateMentionDelivery,
    /// Nothing left after mention stripping.
    EmptyText,
    /// A conversational event missing user/channel/ts.
    MissingFields,
}

/// Routes verified payloads to one of the three outcomes.
pub struct EventDispatcher {
    /// The bot's own user id, if resolved (via `auth.test`).
    bot_user_id: Option<String>,
}

impl EventDispatcher {
    /// Create a dispatcher. Without a bot user id, self-message filtering
    /// falls back to the `bot_id` field alone.
    pub fn new(bot_user_id: Option<String>) -> Self {
        Self { bot_user_id }
    }

    /// Classify a verified payload.
    pub fn dispatch(&self, envelope: EventEnvelope) -> Dispatch {
        match envelope {
            EventEnvelope::UrlVerification { challenge } => Dispatch::Handshake(challenge),
            EventEnvelope::Unrecognized => Dispatch::Ignored(IgnoreReason::UnrecognizedEventType),
            EventEnvelope::EventCallback { event } => match event {
                CallbackEvent::AppMention(ev) => self.dispatch_mention(ev),
                CallbackEvent::Message(ev) => self.dispatch_message(ev),
                CallbackEvent::Unrecognized => {
                    Dispatch::Ignored(IgnoreReason::UnrecognizedEventType)
                }
            },
        }
    }

    fn dispatch_mention(&self, ev: MessageEvent) -> Dispatch {
        if ev.bot_id.is_some() || self.is_own_message(&ev) {
            return Dispatch::Ignored(IgnoreReason::BotMessage);
        }
        self.forward(ev, false)
    }

    fn dispatch_message(&self, ev: MessageEvent) -> Dispatch {
        if ev.bot_id.is_some() || self.is_own_message(&ev) {
            return Dispatch::Ignored(IgnoreReason::BotMessage);
        }
        // Edits, joins, bot_message, etc. are never relayed
        if let Some(subtype) = &ev.subtype {
            if subtype == "bot_message" {
                return Dispatch::Ignored(IgnoreReason::BotMessage);
            }
            return Dispatch::Ignored(IgnoreReason::MessageSubtype);
        }
        if ev.is_direct_message() {
            return self.forward(ev, true);
        }
        // Channel message: only the app_mention delivery is conversational
        if let (Some(bot_id), Some(text)) = (&self.bot_user_id, &ev.text) {
            if text.contains(&format!("<@{}>", bot_id)) {
                return Dispatch::Ignored(IgnoreReason::DuplicateMentionDelivery);
            }
        }
        Dispatch::Ignored(IgnoreReason::NotConversational)
    }

    fn is_own_message(&self, ev: &MessageEvent) -> bool {
        match (&self.bot_user_id, &ev.user) {
            (Some(bot), Some(user)) => bot == user,
            _ => false,
        }
    }

    fn forward(&self, ev: MessageEvent, is_direct_message: bool) -> Dispatch {
        let (Some(user), Some(channel), Some(ts)) = (ev.user, ev.channel, ev.ts) else {
            return Dispatch::Ignored(IgnoreReason::MissingFields);
        };

        let text = strip_mentions(ev.text.as_deref().unwrap_or(""));
        if text.is_empty() {
            return Dispatch::Ignored(IgnoreReason::EmptyText);
        }

        let mut event = InboundEvent::new(channel, user, text, ts);
        event.thread_ts = ev.thread_ts;
        event.is_direct_message = is_direct_message;
        Dispatch::Forward(event)
    }
}

/// Strip `<@U…>` mention tokens from message text.
pub fn strip_mentions(text: &str) -> String {
    static MENTION: OnceLock<Regex> = OnceLock::new();
    let re = MENTION.get_or_init(|| Regex::new(r"<@[^>]+>").expect("valid mention pattern"));
    re.replace_all(text, "").trim().to_string()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
