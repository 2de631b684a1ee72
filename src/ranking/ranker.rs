use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::embedding::{EmbeddingCache, EmbeddingClient};
use crate::graph::{GraphSession, GraphStore};
use crate::retrieval::RequirementRecord;

use super::model::{ConnectedNodeBundle, RankedRequirement, Reducer};
use super::similarity::clamped_cosine;

/// Ranks candidate requirements by semantic similarity to the query entities.
///
/// Ranking never fails: a candidate without a stored embedding scores zero
/// (a non-match, not an error), and enrichment errors leave the affected
/// bundle empty. Sorting is stable, so equally scored candidates keep their
/// retrieval order.
pub struct SimilarityRanker<S, C> {
    store: Arc<S>,
    cache: Arc<EmbeddingCache<C>>,
    embed_model: String,
    reducer: Reducer,
}

impl<S, C> SimilarityRanker<S, C>
where
    S: GraphStore,
    C: EmbeddingClient + Send + Sync,
{
    pub fn new(
        store: Arc<S>,
        cache: Arc<EmbeddingCache<C>>,
        embed_model: impl Into<String>,
        reducer: Reducer,
    ) -> Self {
        Self {
            store,
            cache,
            embed_model: embed_model.into(),
            reducer,
        }
    }

    /// Scores and sorts `candidates` against `entities`, keeping the first
    /// `top_n` when given. With `enrich`, retained records get their depth-1
    /// graph neighborhood attached; discarded candidates are never enriched.
    pub async fn rank(
        &self,
        entities: &[String],
        candidates: Vec<RequirementRecord>,
        top_n: Option<usize>,
        enrich: bool,
    ) -> Vec<RankedRequirement> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let entity_vectors = self.embed_entities(entities).await;

        let mut ranked: Vec<RankedRequirement> = candidates
            .into_iter()
            .map(|record| {
                let score = match &record.embedding {
                    Some(vector) => {
                        let scores: Vec<f32> = entity_vectors
                            .iter()
                            .map(|e| clamped_cosine(e, vector))
                            .collect();
                        self.reducer.reduce(&scores)
                    }
                    None => 0.0,
                };
                RankedRequirement {
                    record,
                    score,
                    connected: ConnectedNodeBundle::default(),
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        if let Some(n) = top_n {
            ranked.truncate(n);
        }

        if enrich {
            self.enrich(&mut ranked).await;
        }
        ranked
    }

    async fn embed_entities(&self, entities: &[String]) -> Vec<Arc<Vec<f32>>> {
        let batch = self
            .cache
            .get_or_create_batch(entities, &self.embed_model)
            .await;
        for failed in batch.failures() {
            warn!(entity = %failed, "entity embedding failed, similarity contribution lost");
        }
        entities.iter().filter_map(|e| batch.get(e)).collect()
    }

    /// Attaches the depth-1 neighborhood to each ranked candidate. Failures
    /// are logged and leave the affected bundle empty.
    async fn enrich(&self, ranked: &mut [RankedRequirement]) {
        let session = match self.store.session().await {
            Ok(session) => session,
            Err(error) => {
                warn!(%error, "enrichment session failed, returning bare ranking");
                return;
            }
        };

        for item in ranked.iter_mut() {
            match session.traverse_neighbors(&item.record.key, 1).await {
                Ok(neighbors) => {
                    for (_, node) in neighbors {
                        item.connected.push(node);
                    }
                }
                Err(error) => {
                    debug!(key = %item.record.key, %error, "enrichment skipped");
                }
            }
        }
    }
}
