//! Two-path candidate retrieval.
//!
//! Path A filters requirements by category (and optionally loan program)
//! through exact graph queries. Path B embeds the borrower's entity keywords
//! and fans out per-entity similarity queries. The paths are combined by
//! intersection, falling back to the category result when the intersection
//! is empty.

pub mod error;
pub mod model;
pub mod retriever;

#[cfg(test)]
mod tests;

pub use error::RetrievalError;
pub use model::{CandidateSet, RequirementRecord};
pub use retriever::{
    CandidateRetriever, CombinePolicy, MAX_SEMANTIC_CONCURRENCY, RetrievalQuery,
};
