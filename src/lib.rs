//! Lintel library crate (used by the CLI binary and integration tests).
//!
//! Ranks loan-document compliance deficiencies in three stages:
//!
//! 1. **Retrieval** ([`retrieval`]): pulls candidate requirements from the
//!    knowledge graph by category/program (exact) and by per-entity semantic
//!    similarity, combined by intersection with a category fallback.
//! 2. **Ranking** ([`ranking`]): orders candidates by clamped cosine
//!    similarity against the document's query texts and enriches the results
//!    with their depth-1 graph neighborhood.
//! 3. **Scoring** ([`scoring`]): computes a deterministic detection
//!    confidence per deficiency, evaluates priority dimensions with an LLM,
//!    and returns the top-N deficiencies by priority.
//!
//! Supporting modules: [`config`] (env-backed settings), [`embedding`]
//! (service client plus bounded cache), [`graph`] (store traits and the
//! Neo4j backend), [`generation`] (completion client), [`catalog`]
//! (condition rows), [`pipeline`] (run envelope and entity extraction).
//!
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod catalog;
pub mod config;
pub mod embedding;
pub mod generation;
pub mod graph;
pub mod pipeline;
pub mod ranking;
pub mod retrieval;
pub mod scoring;

pub use catalog::{ConditionCatalog, ConditionRow};
pub use config::{Config, ConfigError};
pub use embedding::{EmbeddingCache, EmbeddingClient, EmbeddingError, HttpEmbedder};
pub use generation::{Completion, CompletionClient, GenAiClient, GenerationError, TokenUsage};
pub use graph::{GraphError, GraphNode, GraphSession, GraphStore, Neo4jStore};
pub use pipeline::{RunReport, extract_entity_keywords};
pub use ranking::{RankedRequirement, Reducer, SimilarityRanker};
pub use retrieval::{CandidateRetriever, CandidateSet, RequirementRecord, RetrievalQuery};
pub use scoring::{
    DeficiencyRanker, DeficiencyRecord, ScoreReport, ScoredDeficiency, ScoringConfig,
    ScoringError,
};

#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use generation::MockCompleter;
#[cfg(any(test, feature = "mock"))]
pub use graph::MockGraphStore;
