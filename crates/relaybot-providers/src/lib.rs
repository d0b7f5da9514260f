//! LLM provider layer for Relaybot.
//!
//! # Architecture
//!
//! - [`traits::LlmProvider`] — trait the relay loop calls through
//! - [`http_provider::HttpProvider`] — OpenAI-compatible HTTP client

pub mod http_provider;
pub mod traits;

// Re-export main types for convenience
pub use http_provider::HttpProvider;
pub use traits::{LlmProvider, LlmRequestConfig};
