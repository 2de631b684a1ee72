//! Chat-completion client used by the priority evaluator.

pub mod client;
pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::{Completion, CompletionClient, GenAiClient, TokenUsage};
pub use error::GenerationError;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockCompleter;
