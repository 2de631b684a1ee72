//! Embedding service client and bounded vector cache.
//!
//! The cache is keyed by `(model, text)` and enforces a fixed capacity with a
//! full flush once exceeded (see [`EvictionPolicy::FlushAtCapacity`]). Batch
//! lookups go through the service's batch endpoint in a single round trip and
//! degrade to per-item calls when that fails; item-level failures are soft.

pub mod cache;
pub mod client;
pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use cache::{BatchEmbeddings, DEFAULT_CACHE_CAPACITY, EmbeddingCache, EvictionPolicy};
pub use client::{EMBED_BATCH_LIMIT, EmbeddingClient, HttpEmbedder};
pub use error::EmbeddingError;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
