use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::client::EmbeddingClient;
use super::error::EmbeddingError;

/// Deterministic in-memory embedder for tests.
///
/// Vectors are derived from the text bytes so the same text always embeds to
/// the same vector. Individual texts can be marked as failing, and whole
/// batch calls can be forced to fail to exercise the per-item fallback.
#[derive(Default)]
pub struct MockEmbedder {
    dimension: usize,
    failing_texts: HashSet<String>,
    fail_batch_calls: bool,
    single_calls: AtomicUsize,
    batch_calls: AtomicUsize,
}

impl MockEmbedder {
    /// Creates a mock producing vectors of `dimension`.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ..Default::default()
        }
    }

    /// Marks `text` as failing on every call.
    pub fn fail_text(mut self, text: impl Into<String>) -> Self {
        self.failing_texts.insert(text.into());
        self
    }

    /// Forces every batch call to fail (per-item calls still succeed).
    pub fn fail_batches(mut self) -> Self {
        self.fail_batch_calls = true;
        self
    }

    /// Number of single-item calls observed.
    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    /// Number of batch calls observed.
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    /// The vector this mock produces for `text`.
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let seed = text
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
        (0..self.dimension)
            .map(|i| {
                let x = seed.wrapping_add(i as u32).wrapping_mul(2654435761);
                (x % 1000) as f32 / 1000.0 + 0.001
            })
            .collect()
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.failing_texts.contains(text) {
            return Err(EmbeddingError::ServiceError {
                status: 500,
                message: format!("mock failure for '{text}'"),
            });
        }
        Ok(self.vector_for(text))
    }
}

impl EmbeddingClient for MockEmbedder {
    async fn embed(&self, text: &str, _model: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.embed_one(text)
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        _model: &str,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_batch_calls {
            return Err(EmbeddingError::RequestFailed {
                message: "mock batch failure".to_string(),
            });
        }

        texts.iter().map(|t| self.embed_one(t)).collect()
    }
}
