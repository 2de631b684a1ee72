use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by knowledge-graph store operations.
pub enum GraphError {
    /// Could not connect to the bolt endpoint.
    #[error("failed to connect to graph store at '{uri}': {message}")]
    ConnectionFailed {
        /// Endpoint URI.
        uri: String,
        /// Error message.
        message: String,
    },

    /// A query failed to execute.
    #[error("graph query failed ({context}): {message}")]
    QueryFailed {
        /// Which query was running.
        context: &'static str,
        /// Error message.
        message: String,
    },

    /// A returned row or node could not be decoded.
    #[error("failed to decode graph result ({context}): {message}")]
    DecodeFailed {
        /// Which query was running.
        context: &'static str,
        /// Error message.
        message: String,
    },
}
