use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::embedding::{EmbeddingCache, EmbeddingClient};
use crate::graph::{GraphSession, GraphStore};

use super::error::RetrievalError;
use super::model::{CandidateSet, RequirementRecord};

/// Upper bound on concurrent semantic fan-out tasks.
pub const MAX_SEMANTIC_CONCURRENCY: usize = 5;

/// How the two retrieval paths are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombinePolicy {
    /// Intersect category and semantic results by key; when the intersection
    /// is empty (or the semantic path returned nothing), fall back to the
    /// full category result.
    #[default]
    IntersectElsePathA,
}

/// Inputs to a retrieval run.
#[derive(Debug, Clone, Default)]
pub struct RetrievalQuery {
    /// Requirement categories to match exactly.
    pub categories: Vec<String>,
    /// Optional loan program to restrict the category path.
    pub program: Option<String>,
    /// Entity keywords driving the semantic path (may be empty).
    pub entities: Vec<String>,
}

/// Two-path candidate retriever.
///
/// The category path is authoritative and its failure is fatal. The semantic
/// path fans out one similarity query per entity keyword, each on its own
/// graph session; any of those failing only narrows the refinement.
pub struct CandidateRetriever<S, C> {
    store: Arc<S>,
    cache: Arc<EmbeddingCache<C>>,
    embed_model: String,
    similarity_threshold: f32,
    semantic_top_k: usize,
    policy: CombinePolicy,
}

impl<S, C> CandidateRetriever<S, C>
where
    S: GraphStore + 'static,
    C: EmbeddingClient + Send + Sync + 'static,
{
    pub fn new(
        store: Arc<S>,
        cache: Arc<EmbeddingCache<C>>,
        embed_model: impl Into<String>,
        similarity_threshold: f32,
        semantic_top_k: usize,
    ) -> Self {
        Self {
            store,
            cache,
            embed_model: embed_model.into(),
            similarity_threshold,
            semantic_top_k,
            policy: CombinePolicy::default(),
        }
    }

    /// Runs both paths and combines them under the configured policy.
    pub async fn retrieve(
        &self,
        query: &RetrievalQuery,
    ) -> Result<CandidateSet, RetrievalError> {
        let category_set = self.category_path(query).await?;
        info!(
            candidates = category_set.len(),
            categories = ?query.categories,
            "category path complete"
        );

        if query.entities.is_empty() {
            return Ok(category_set);
        }

        let semantic_keys = self.semantic_path(&query.entities).await;
        debug!(keys = semantic_keys.len(), "semantic path complete");

        Ok(self.combine(category_set, semantic_keys))
    }

    async fn category_path(
        &self,
        query: &RetrievalQuery,
    ) -> Result<CandidateSet, RetrievalError> {
        let session = self
            .store
            .session()
            .await
            .map_err(RetrievalError::SessionFailed)?;

        let matches = session
            .query_by_category(&query.categories, query.program.as_deref())
            .await
            .map_err(RetrievalError::CategoryPathFailed)?;

        Ok(matches
            .into_iter()
            .map(RequirementRecord::from_category_match)
            .collect())
    }

    /// Returns the set of candidate keys reachable from any entity keyword.
    /// Embedding or query failures for individual entities are soft.
    async fn semantic_path(&self, entities: &[String]) -> Vec<String> {
        let batch = self.cache.get_or_create_batch(entities, &self.embed_model).await;
        for failed in batch.failures() {
            warn!(entity = %failed, "entity embedding failed, skipping");
        }

        let embedded: Vec<(String, Arc<Vec<f32>>)> = entities
            .iter()
            .filter_map(|e| batch.get(e).map(|v| (e.clone(), v)))
            .collect();
        if embedded.is_empty() {
            return Vec::new();
        }

        let concurrency = embedded.len().min(MAX_SEMANTIC_CONCURRENCY);
        let results: Vec<Vec<String>> = stream::iter(embedded)
            .map(|(entity, embedding)| {
                let store = Arc::clone(&self.store);
                let threshold = self.similarity_threshold;
                let top_k = self.semantic_top_k;
                async move {
                    let session = match store.session().await {
                        Ok(session) => session,
                        Err(error) => {
                            warn!(entity = %entity, %error, "session open failed");
                            return Vec::new();
                        }
                    };
                    match session.query_similar(&embedding, threshold, top_k).await {
                        Ok(nodes) => nodes
                            .into_iter()
                            .map(|node| RequirementRecord::from_node(node, Vec::new()).key)
                            .collect(),
                        Err(error) => {
                            warn!(entity = %entity, %error, "semantic query failed");
                            Vec::new()
                        }
                    }
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let mut keys: Vec<String> = Vec::new();
        for batch in results {
            for key in batch {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    fn combine(&self, mut category_set: CandidateSet, semantic_keys: Vec<String>) -> CandidateSet {
        match self.policy {
            CombinePolicy::IntersectElsePathA => {
                if semantic_keys.is_empty() {
                    return category_set;
                }
                let intersects = category_set
                    .iter()
                    .any(|r| semantic_keys.contains(&r.key));
                if !intersects {
                    debug!("empty intersection, keeping full category result");
                    return category_set;
                }
                category_set.retain(|key| semantic_keys.iter().any(|k| k == key));
                category_set
            }
        }
    }
}
