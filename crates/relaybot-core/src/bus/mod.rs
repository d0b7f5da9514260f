//! Async message bus — decouples webhook acknowledgment from reply delivery.

pub mod queue;
pub mod types;

pub use queue::MessageBus;
pub use types::{InboundEvent, OutboundReply};
