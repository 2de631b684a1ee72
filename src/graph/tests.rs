use serde_json::{Map, json};

use super::mock::MockGraphStore;
use super::node::GraphNode;
use super::store::{GraphSession, GraphStore};

#[test]
fn test_business_id_prefers_id_over_name() {
    let mut properties = Map::new();
    properties.insert("id".to_string(), json!("REQ-1"));
    properties.insert("name".to_string(), json!("Appraisal"));
    let node = GraphNode::new(None, vec!["Requirement".to_string()], properties);

    assert_eq!(node.business_id(), Some("REQ-1"));
}

#[test]
fn test_business_id_falls_back_to_name() {
    let mut properties = Map::new();
    properties.insert("name".to_string(), json!("Appraisal"));
    let node = GraphNode::new(None, vec![], properties);

    assert_eq!(node.business_id(), Some("Appraisal"));
}

#[test]
fn test_take_embedding_strips_property() {
    let mut properties = Map::new();
    properties.insert("embedding".to_string(), json!([0.1, 0.2, 0.3]));
    let mut node = GraphNode::new(None, vec![], properties);

    let embedding = node.take_embedding().unwrap();
    assert_eq!(embedding.len(), 3);
    assert!(node.properties.get("embedding").is_none());
}

#[test]
fn test_take_embedding_rejects_mixed_array() {
    let mut properties = Map::new();
    properties.insert("embedding".to_string(), json!([0.1, "not a number"]));
    let mut node = GraphNode::new(None, vec![], properties);

    assert!(node.take_embedding().is_none());
}

#[tokio::test]
async fn test_category_filter_matches_only_listed_categories() {
    let store = MockGraphStore::new();
    store.add_requirement("REQ-1", "Income", &["FlexSelect"], None);
    store.add_requirement("REQ-2", "Assets", &["FlexSelect"], None);

    let session = store.session().await.unwrap();
    let matches = session
        .query_by_category(&["Income".to_string()], None)
        .await
        .unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].node.business_id(), Some("REQ-1"));
}

#[tokio::test]
async fn test_program_match_is_case_insensitive_substring() {
    let store = MockGraphStore::new();
    store.add_requirement("REQ-1", "Income", &["FlexSelect Plus"], None);
    store.add_requirement("REQ-2", "Income", &["Other"], None);

    let session = store.session().await.unwrap();

    // Query substring of stored name.
    let matches = session
        .query_by_category(&["Income".to_string()], Some("flexselect"))
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);

    // Stored name substring of query.
    let matches = session
        .query_by_category(&["Income".to_string()], Some("OTHER program variant"))
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].node.business_id(), Some("REQ-2"));
}

#[tokio::test]
async fn test_similarity_respects_threshold_and_top_k() {
    let store = MockGraphStore::new();
    store.add_requirement("close", "Income", &[], Some(vec![1.0, 0.0]));
    store.add_requirement("near", "Income", &[], Some(vec![0.9, 0.4]));
    store.add_requirement("far", "Income", &[], Some(vec![0.0, 1.0]));

    let session = store.session().await.unwrap();
    let nodes = session.query_similar(&[1.0, 0.0], 0.5, 10).await.unwrap();

    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].business_id(), Some("close"));

    let limited = session.query_similar(&[1.0, 0.0], 0.5, 1).await.unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn test_similarity_surfaces_linked_requirements_only() {
    let store = MockGraphStore::new();
    // The embedded node is an entity, not a requirement; only the requirement
    // it links to may come back.
    store.add_embedded_node("ENT-1", "Entity", vec![1.0, 0.0]);
    store.add_requirement("REQ-1", "Income", &[], None);
    store.add_edge("ENT-1", "MENTIONS", "REQ-1");

    let session = store.session().await.unwrap();
    let nodes = session.query_similar(&[1.0, 0.0], 0.5, 10).await.unwrap();

    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].business_id(), Some("REQ-1"));
    assert!(nodes[0].has_label("Requirement"));
}

#[tokio::test]
async fn test_similarity_dedups_requirements_reached_twice() {
    let store = MockGraphStore::new();
    store.add_requirement("REQ-1", "Income", &[], Some(vec![1.0, 0.0]));
    store.add_embedded_node("ENT-1", "Entity", vec![0.9, 0.1]);
    store.add_edge("ENT-1", "MENTIONS", "REQ-1");

    let session = store.session().await.unwrap();
    let nodes = session.query_similar(&[1.0, 0.0], 0.5, 10).await.unwrap();

    // Reached directly and through the entity, returned once.
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].business_id(), Some("REQ-1"));
}

#[tokio::test]
async fn test_sessions_are_counted_per_acquisition() {
    let store = MockGraphStore::new();
    store.session().await.unwrap();
    store.session().await.unwrap();

    assert_eq!(store.sessions_opened(), 2);
}

#[tokio::test]
async fn test_traverse_neighbors_is_undirected() {
    let store = MockGraphStore::new();
    store.add_requirement("REQ-1", "Income", &[], None);
    store.add_node("DOC-1", "Document", Map::new());
    store.add_edge("DOC-1", "REQUIRES", "REQ-1");

    let session = store.session().await.unwrap();
    let neighbors = session.traverse_neighbors("REQ-1", 1).await.unwrap();

    assert_eq!(neighbors.len(), 1);
    assert_eq!(neighbors[0].0, "REQUIRES");
    assert_eq!(neighbors[0].1.business_id(), Some("DOC-1"));
}
