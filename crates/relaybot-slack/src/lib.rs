//! Relaybot Slack integration — Events API webhook + Web API client.
//!
//! This crate provides:
//! - **signature**: HMAC-SHA256 verification of inbound webhook requests
//! - **events**: typed Events API payloads and the dispatch logic
//! - **webhook**: the axum router (`/`, `/slack/events`, `/slack/commands`)
//! - **api**: the Web API client (`chat.postMessage`, `auth.test`)
//! - **outbound**: the reply dispatcher draining the bus into the Web API
//!
//! # Architecture
//!
//! ```text
//! Slack → webhook (verify → dispatch) → bus → relay loop
//!                                              ↓
//!         Slack ← outbound dispatcher ← bus ←  reply
//! ```

pub mod api;
pub mod events;
pub mod outbound;
pub mod signature;
pub mod webhook;

pub use api::SlackClient;
pub use events::{Dispatch, EventDispatcher, EventEnvelope};
pub use outbound::ReplyDispatcher;
pub use signature::{SignatureError, SignatureVerifier};
