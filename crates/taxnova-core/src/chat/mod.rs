//! Streaming chat-completion client and secrets.

mod client;
mod secrets;
pub mod sse;

pub use client::{fragments, ChatClient, CompletionRequest, CompletionSource, FragmentStream};
pub use secrets::{SecretSource, Secrets};

use crate::error::ChatError;

/// Result type for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;
