use std::sync::Arc;

use super::cache::{EmbeddingCache, EvictionPolicy};
use super::mock::MockEmbedder;

const MODEL: &str = "test-embed";

#[tokio::test]
async fn test_get_or_create_hits_cache_on_second_call() {
    let cache = EmbeddingCache::new(MockEmbedder::new(8));

    let first = cache.get_or_create("Appraisal Report", MODEL).await.unwrap();
    let second = cache.get_or_create("Appraisal Report", MODEL).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_cache_key_includes_model() {
    let cache = EmbeddingCache::new(MockEmbedder::new(8));

    cache.get_or_create("text", "model-a").await.unwrap();
    cache.get_or_create("text", "model-b").await.unwrap();

    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_batch_uses_single_round_trip() {
    let embedder = Arc::new(MockEmbedder::new(8));
    let cache = EmbeddingCache::new(Arc::clone(&embedder));
    let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];

    let result = cache.get_or_create_batch(&texts, MODEL).await;

    assert_eq!(result.len(), 3);
    assert!(result.failures().is_empty());
    assert_eq!(cache.len(), 3);
    // All three misses travel in one batch call.
    assert_eq!(embedder.batch_calls(), 1);
    assert_eq!(embedder.single_calls(), 0);
}

#[tokio::test]
async fn test_warm_batch_makes_no_service_calls() {
    let embedder = Arc::new(MockEmbedder::new(8));
    let cache = EmbeddingCache::new(Arc::clone(&embedder));
    let texts = vec!["a".to_string(), "b".to_string()];

    cache.get_or_create_batch(&texts, MODEL).await;
    cache.get_or_create_batch(&texts, MODEL).await;

    assert_eq!(embedder.batch_calls(), 1);
    assert_eq!(embedder.single_calls(), 0);
}

#[tokio::test]
async fn test_batch_skips_already_cached_texts() {
    let embedder = MockEmbedder::new(8);
    let cache = EmbeddingCache::new(embedder);

    cache.get_or_create("a", MODEL).await.unwrap();

    let texts = vec!["a".to_string(), "b".to_string()];
    let result = cache.get_or_create_batch(&texts, MODEL).await;

    assert_eq!(result.len(), 2);
    assert!(result.get("a").is_some());
    assert!(result.get("b").is_some());
}

#[tokio::test]
async fn test_batch_failure_falls_back_to_per_item() {
    let embedder = Arc::new(MockEmbedder::new(8).fail_batches());
    let cache = EmbeddingCache::new(Arc::clone(&embedder));

    let texts = vec!["a".to_string(), "b".to_string()];
    let result = cache.get_or_create_batch(&texts, MODEL).await;

    assert_eq!(result.len(), 2);
    assert!(result.failures().is_empty());
    // One failed batch attempt, then one single call per miss.
    assert_eq!(embedder.batch_calls(), 1);
    assert_eq!(embedder.single_calls(), 2);
}

#[tokio::test]
async fn test_failing_item_is_skipped_not_fatal() {
    let embedder = MockEmbedder::new(8).fail_batches().fail_text("bad");
    let cache = EmbeddingCache::new(embedder);

    let texts = vec!["good".to_string(), "bad".to_string()];
    let result = cache.get_or_create_batch(&texts, MODEL).await;

    assert_eq!(result.len(), 1);
    assert!(result.get("good").is_some());
    assert!(result.get("bad").is_none());
    assert_eq!(result.failures(), &["bad".to_string()]);
}

#[tokio::test]
async fn test_flush_at_capacity_clears_whole_cache() {
    let cache =
        EmbeddingCache::with_policy(MockEmbedder::new(4), EvictionPolicy::FlushAtCapacity(3));

    cache.get_or_create("a", MODEL).await.unwrap();
    cache.get_or_create("b", MODEL).await.unwrap();
    cache.get_or_create("c", MODEL).await.unwrap();
    assert_eq!(cache.len(), 3);

    // Fourth insert trips the policy: full flush, then insert.
    cache.get_or_create("d", MODEL).await.unwrap();
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_capacity_is_never_exceeded() {
    let cache =
        EmbeddingCache::with_policy(MockEmbedder::new(4), EvictionPolicy::FlushAtCapacity(2));

    for text in ["a", "b", "c", "d", "e"] {
        cache.get_or_create(text, MODEL).await.unwrap();
        assert!(cache.len() <= 2);
    }
}

#[tokio::test]
async fn test_duplicate_texts_in_batch_embed_once() {
    let embedder = MockEmbedder::new(8);
    let cache = EmbeddingCache::new(embedder);

    let texts = vec!["a".to_string(), "a".to_string(), "b".to_string()];
    let result = cache.get_or_create_batch(&texts, MODEL).await;

    assert_eq!(result.len(), 2);
    assert_eq!(cache.len(), 2);
}
