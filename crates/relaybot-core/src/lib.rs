//! Relaybot core — shared types, message bus, and configuration.
//!
//! This crate holds everything the other crates agree on:
//! - [`types`] — OpenAI chat-completions wire types
//! - [`bus`] — the inbound-event / outbound-reply queues
//! - [`config`] — config schema, loader, and env overrides

pub mod bus;
pub mod config;
pub mod types;
pub mod utils;
