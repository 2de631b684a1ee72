use thiserror::Error;

use crate::graph::GraphError;

#[derive(Debug, Error)]
/// Errors returned by candidate retrieval.
pub enum RetrievalError {
    /// The category path failed. This path is authoritative, so its failure
    /// aborts retrieval (the semantic path degrades instead).
    #[error("category retrieval failed: {0}")]
    CategoryPathFailed(#[source] GraphError),

    /// Could not open a graph session.
    #[error("failed to open graph session: {0}")]
    SessionFailed(#[source] GraphError),
}
