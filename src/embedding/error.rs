use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the embedding service client.
pub enum EmbeddingError {
    /// The HTTP request failed before a response was received.
    #[error("embedding request failed: {message}")]
    RequestFailed {
        /// Transport error message.
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("embedding service returned status {status}: {message}")]
    ServiceError {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        message: String,
    },

    /// The response body could not be decoded.
    #[error("malformed embedding response: {message}")]
    MalformedResponse {
        /// Decode error message.
        message: String,
    },

    /// The batch response did not contain a vector for every input.
    #[error("embedding batch returned {actual} vectors for {expected} inputs")]
    BatchLengthMismatch {
        /// Number of inputs sent.
        expected: usize,
        /// Number of vectors received.
        actual: usize,
    },
}
