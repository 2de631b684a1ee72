use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::debug;

use super::error::GenerationError;

/// Token accounting for one completion call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: Option<u64>,
    pub cache_creation_tokens: Option<u64>,
}

/// A completed generation: the text plus usage, when the provider reports it.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
}

/// Chat-completion seam. The evaluator only ever needs a system prompt, a
/// user prompt, and the text that comes back.
pub trait CompletionClient: Send + Sync {
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl std::future::Future<Output = Result<Completion, GenerationError>> + Send;
}

const MAX_COMPLETION_TOKENS: u32 = 1000;

/// Provider-agnostic client over the `genai` multi-provider SDK. The model
/// string selects the provider (resolved by genai from the model name).
pub struct GenAiClient {
    client: Client,
    model: String,
    options: ChatOptions,
}

impl GenAiClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
            options: ChatOptions::default().with_max_tokens(MAX_COMPLETION_TOKENS),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CompletionClient for GenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Completion, GenerationError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_prompt),
        ]);

        let response = self
            .client
            .exec_chat(&self.model, request, Some(&self.options))
            .await
            .map_err(|e| GenerationError::ProviderError {
                model: self.model.clone(),
                message: e.to_string(),
            })?;

        let usage = TokenUsage {
            input_tokens: response.usage.prompt_tokens.unwrap_or(0).max(0) as u64,
            output_tokens: response.usage.completion_tokens.unwrap_or(0).max(0) as u64,
            cache_read_tokens: response
                .usage
                .prompt_tokens_details
                .as_ref()
                .and_then(|d| d.cached_tokens)
                .map(|t| t.max(0) as u64),
            cache_creation_tokens: response
                .usage
                .prompt_tokens_details
                .as_ref()
                .and_then(|d| d.cache_creation_tokens)
                .map(|t| t.max(0) as u64),
        };

        let text = response
            .first_text()
            .map(str::to_string)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| GenerationError::EmptyResponse {
                model: self.model.clone(),
            })?;

        debug!(
            model = %self.model,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "completion received"
        );

        Ok(Completion { text, usage })
    }
}
