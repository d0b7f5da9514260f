//! Relaybot reply orchestration.
//!
//! [`RelayLoop`] consumes verified inbound events from the bus, obtains a
//! completion from the LLM provider, and publishes the reply back onto the
//! bus for delivery.

pub mod relay_loop;

pub use relay_loop::RelayLoop;
