use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the completion client.
pub enum GenerationError {
    /// The provider call failed (transport or provider-side error).
    #[error("completion request failed for model '{model}': {message}")]
    ProviderError {
        /// Model the request targeted.
        model: String,
        /// Error message.
        message: String,
    },

    /// The provider answered but without any text content.
    #[error("completion response for model '{model}' contained no text")]
    EmptyResponse {
        /// Model the request targeted.
        model: String,
    },
}
