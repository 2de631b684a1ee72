use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::client::EmbeddingClient;
use super::error::EmbeddingError;

/// Default entry capacity before a flush.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// How the cache sheds entries once full.
///
/// Named explicitly so the policy can be swapped without touching callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Clear the whole cache before inserting the entry that would exceed
    /// `capacity`. A latency/simplicity tradeoff, not a correctness
    /// requirement; capacity is the only invariant.
    FlushAtCapacity(usize),
}

impl EvictionPolicy {
    fn capacity(&self) -> usize {
        match self {
            EvictionPolicy::FlushAtCapacity(n) => *n,
        }
    }
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        EvictionPolicy::FlushAtCapacity(DEFAULT_CACHE_CAPACITY)
    }
}

/// Outcome of a batch lookup.
///
/// Failing texts are omitted from `vectors` and listed in `failures`;
/// embedding-service errors are soft at item granularity.
#[derive(Debug, Default)]
pub struct BatchEmbeddings {
    vectors: HashMap<String, Arc<Vec<f32>>>,
    failures: Vec<String>,
}

impl BatchEmbeddings {
    /// Returns a shared handle to the vector for `text`, if it was embedded.
    pub fn get(&self, text: &str) -> Option<Arc<Vec<f32>>> {
        self.vectors.get(text).cloned()
    }

    /// Number of embedded texts.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns `true` if nothing was embedded.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Texts the service failed to embed.
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Iterates over `(text, vector)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.vectors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Bounded `(model, text) -> vector` cache over an [`EmbeddingClient`].
///
/// Injectable (constructed explicitly, shared via `Arc`), with all
/// check-then-insert sequences serialized under a single mutex. The critical
/// section is tiny; no finer-grained locking is needed.
pub struct EmbeddingCache<C> {
    client: C,
    entries: Mutex<HashMap<(String, String), Arc<Vec<f32>>>>,
    policy: EvictionPolicy,
}

impl<C: EmbeddingClient> EmbeddingCache<C> {
    /// Creates a cache with the default flush-at-capacity policy.
    pub fn new(client: C) -> Self {
        Self::with_policy(client, EvictionPolicy::default())
    }

    /// Creates a cache with an explicit eviction policy.
    pub fn with_policy(client: C, policy: EvictionPolicy) -> Self {
        Self {
            client,
            entries: Mutex::new(HashMap::new()),
            policy,
        }
    }

    /// Returns the number of cached vectors.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Returns the vector for `text`, fetching it from the service on a miss.
    pub async fn get_or_create(
        &self,
        text: &str,
        model: &str,
    ) -> Result<Arc<Vec<f32>>, EmbeddingError> {
        if let Some(hit) = self.lookup(text, model) {
            return Ok(hit);
        }

        let vector = self.client.embed(text, model).await?;
        Ok(self.insert(text, model, vector))
    }

    /// Returns vectors for `texts`, fetching misses in one batch round trip.
    ///
    /// On a batch-call failure, falls back to per-item requests; items that
    /// still fail are skipped, warn-logged, and reported in the result.
    pub async fn get_or_create_batch(&self, texts: &[String], model: &str) -> BatchEmbeddings {
        let mut result = BatchEmbeddings::default();
        let mut misses: Vec<String> = Vec::new();

        for text in texts {
            if result.vectors.contains_key(text) {
                continue;
            }
            match self.lookup(text, model) {
                Some(hit) => {
                    result.vectors.insert(text.clone(), hit);
                }
                None => {
                    if !misses.contains(text) {
                        misses.push(text.clone());
                    }
                }
            }
        }

        if misses.is_empty() {
            return result;
        }

        match self.client.embed_batch(&misses, model).await {
            Ok(vectors) if vectors.len() == misses.len() => {
                for (text, vector) in misses.iter().zip(vectors) {
                    let shared = self.insert(text, model, vector);
                    result.vectors.insert(text.clone(), shared);
                }
            }
            Ok(vectors) => {
                warn!(
                    expected = misses.len(),
                    actual = vectors.len(),
                    "batch embedding returned wrong count, retrying per item"
                );
                self.embed_individually(&misses, model, &mut result).await;
            }
            Err(e) => {
                warn!(error = %e, "batch embedding failed, retrying per item");
                self.embed_individually(&misses, model, &mut result).await;
            }
        }

        result
    }

    async fn embed_individually(
        &self,
        texts: &[String],
        model: &str,
        result: &mut BatchEmbeddings,
    ) {
        for text in texts {
            match self.client.embed(text, model).await {
                Ok(vector) => {
                    let shared = self.insert(text, model, vector);
                    result.vectors.insert(text.clone(), shared);
                }
                Err(e) => {
                    warn!(text = %text, error = %e, "failed to embed, skipping");
                    result.failures.push(text.clone());
                }
            }
        }
    }

    fn lookup(&self, text: &str, model: &str) -> Option<Arc<Vec<f32>>> {
        self.entries
            .lock()
            .get(&(model.to_string(), text.to_string()))
            .cloned()
    }

    fn insert(&self, text: &str, model: &str, vector: Vec<f32>) -> Arc<Vec<f32>> {
        let shared = Arc::new(vector);
        let mut entries = self.entries.lock();

        if entries.len() >= self.policy.capacity() {
            debug!(
                entries = entries.len(),
                capacity = self.policy.capacity(),
                "embedding cache at capacity, flushing"
            );
            entries.clear();
        }

        entries.insert(
            (model.to_string(), text.to_string()),
            Arc::clone(&shared),
        );
        shared
    }
}

impl<C> std::fmt::Debug for EmbeddingCache<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCache")
            .field("entries", &self.entries.lock().len())
            .field("policy", &self.policy)
            .finish()
    }
}
