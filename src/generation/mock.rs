//! Scripted [`CompletionClient`] for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::client::{Completion, CompletionClient, TokenUsage};
use super::error::GenerationError;

/// Returns queued responses in order; once the queue is drained, either
/// repeats the last response or fails, depending on construction.
#[derive(Default)]
pub struct MockCompleter {
    responses: Mutex<VecDeque<Result<String, String>>>,
    calls: AtomicUsize,
    last_user_prompt: Mutex<Option<String>>,
}

impl MockCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful text response.
    pub fn respond(self, text: impl Into<String>) -> Self {
        self.responses.lock().push_back(Ok(text.into()));
        self
    }

    /// Queues a provider error.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.responses.lock().push_back(Err(message.into()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The user prompt from the most recent call.
    pub fn last_user_prompt(&self) -> Option<String> {
        self.last_user_prompt.lock().clone()
    }
}

impl CompletionClient for MockCompleter {
    async fn complete(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Completion, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_user_prompt.lock() = Some(user_prompt.to_string());

        match self.responses.lock().pop_front() {
            Some(Ok(text)) => Ok(Completion {
                text,
                usage: TokenUsage {
                    input_tokens: 10,
                    output_tokens: 10,
                    ..Default::default()
                },
            }),
            Some(Err(message)) => Err(GenerationError::ProviderError {
                model: "mock".to_string(),
                message,
            }),
            None => Err(GenerationError::ProviderError {
                model: "mock".to_string(),
                message: "no scripted response".to_string(),
            }),
        }
    }
}
