use std::sync::Arc;

use serde_json::{Map, json};

use crate::embedding::{EmbeddingCache, MockEmbedder};
use crate::graph::{GraphNode, MockGraphStore};

use super::model::{CandidateSet, RequirementRecord};
use super::retriever::{CandidateRetriever, RetrievalQuery};

fn node_with_id(id: &str) -> GraphNode {
    let mut properties = Map::new();
    properties.insert("id".to_string(), json!(id));
    GraphNode::new(None, vec!["Requirement".to_string()], properties)
}

fn retriever(
    store: &MockGraphStore,
    embedder: MockEmbedder,
) -> CandidateRetriever<MockGraphStore, MockEmbedder> {
    CandidateRetriever::new(
        Arc::new(store.clone()),
        Arc::new(EmbeddingCache::new(embedder)),
        "test-embed",
        0.5,
        20,
    )
}

#[test]
fn test_candidate_set_dedups_by_key_and_merges_programs() {
    let mut set = CandidateSet::new();
    set.insert(RequirementRecord::from_node(
        node_with_id("REQ-1"),
        vec!["A".to_string()],
    ));
    set.insert(RequirementRecord::from_node(
        node_with_id("REQ-1"),
        vec!["B".to_string()],
    ));

    assert_eq!(set.len(), 1);
    let record = set.iter().next().unwrap();
    assert_eq!(record.programs, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn test_anonymous_nodes_get_content_digest_keys() {
    let mut properties = Map::new();
    properties.insert("text".to_string(), json!("verify the appraisal"));
    let a = RequirementRecord::from_node(
        GraphNode::new(None, vec![], properties.clone()),
        Vec::new(),
    );
    let b = RequirementRecord::from_node(GraphNode::new(None, vec![], properties), Vec::new());

    // Same properties, same digest.
    assert_eq!(a.key, b.key);
    assert_eq!(a.key.len(), 64);
}

#[test]
fn test_record_key_strips_embedding_before_digesting() {
    let mut with = Map::new();
    with.insert("text".to_string(), json!("t"));
    with.insert("embedding".to_string(), json!([0.5, 0.5]));
    let mut without = Map::new();
    without.insert("text".to_string(), json!("t"));

    let a = RequirementRecord::from_node(GraphNode::new(None, vec![], with), Vec::new());
    let b = RequirementRecord::from_node(GraphNode::new(None, vec![], without), Vec::new());

    assert_eq!(a.key, b.key);
    assert!(a.embedding.is_some());
}

#[tokio::test]
async fn test_retrieve_without_entities_returns_category_path() {
    let store = MockGraphStore::new();
    store.add_requirement("REQ-1", "Income", &[], None);
    store.add_requirement("REQ-2", "Assets", &[], None);

    let retriever = retriever(&store, MockEmbedder::new(4));
    let result = retriever
        .retrieve(&RetrievalQuery {
            categories: vec!["Income".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert!(result.contains_key("REQ-1"));
}

#[tokio::test]
async fn test_intersection_narrows_category_result() {
    let store = MockGraphStore::new();
    // Both are Income; only REQ-1 carries an embedding, so only it can be
    // reached from the semantic path.
    store.add_requirement("REQ-1", "Income", &[], Some(vec![1.0, 0.0, 0.0, 0.0]));
    store.add_requirement("REQ-2", "Income", &[], None);

    let embedder = MockEmbedder::new(4);
    // Entity text whose mock vector is similar to REQ-1's stored vector.
    let entity = "income statement".to_string();
    let retriever = CandidateRetriever::new(
        Arc::new(store.clone()),
        Arc::new(EmbeddingCache::new(embedder)),
        "test-embed",
        -1.0, // accept any similarity so the mock vectors line up
        20,
    );

    let result = retriever
        .retrieve(&RetrievalQuery {
            categories: vec!["Income".to_string()],
            entities: vec![entity],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert!(result.contains_key("REQ-1"));
}

#[tokio::test]
async fn test_empty_intersection_falls_back_to_category_path() {
    let store = MockGraphStore::new();
    store.add_requirement("REQ-1", "Income", &[], None);
    store.add_requirement("REQ-2", "Income", &[], None);

    // No stored embeddings at all, so the semantic path finds nothing.
    let retriever = retriever(&store, MockEmbedder::new(4));
    let result = retriever
        .retrieve(&RetrievalQuery {
            categories: vec!["Income".to_string()],
            entities: vec!["bank statement".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
}

#[tokio::test]
async fn test_semantic_failure_degrades_to_category_path() {
    let store = MockGraphStore::new();
    store.add_requirement("REQ-1", "Income", &[], Some(vec![1.0, 0.0, 0.0, 0.0]));
    store.fail_next_similar();

    let retriever = retriever(&store, MockEmbedder::new(4));
    let result = retriever
        .retrieve(&RetrievalQuery {
            categories: vec!["Income".to_string()],
            entities: vec!["entity".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
}

#[tokio::test]
async fn test_category_failure_is_fatal() {
    let store = MockGraphStore::new();
    store.fail_category();

    let retriever = retriever(&store, MockEmbedder::new(4));
    let result = retriever
        .retrieve(&RetrievalQuery {
            categories: vec!["Income".to_string()],
            ..Default::default()
        })
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_each_entity_gets_its_own_session() {
    let store = MockGraphStore::new();
    store.add_requirement("REQ-1", "Income", &[], Some(vec![1.0, 0.0, 0.0, 0.0]));

    let retriever = retriever(&store, MockEmbedder::new(4));
    retriever
        .retrieve(&RetrievalQuery {
            categories: vec!["Income".to_string()],
            entities: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();

    // One session for the category path, one per entity.
    assert_eq!(store.sessions_opened(), 4);
}
