//! In-memory [`GraphStore`] for tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;
use serde_json::{Map, Value, json};

use super::error::GraphError;
use super::node::{CategoryMatch, GraphNode};
use super::store::{GraphSession, GraphStore};

struct StoredNode {
    node: GraphNode,
    embedding: Option<Vec<f32>>,
}

struct MockInner {
    nodes: RwLock<Vec<StoredNode>>,
    /// Edges as `(from_ref, relationship_type, to_ref)` over business ids.
    edges: RwLock<Vec<(String, String, String)>>,
    sessions_opened: AtomicUsize,
    fail_next_similar: AtomicBool,
    fail_category: AtomicBool,
}

/// Deterministic in-memory store. Similarity is computed locally with true
/// cosine, so tests control exact scores through the stored vectors.
#[derive(Clone)]
pub struct MockGraphStore {
    inner: Arc<MockInner>,
}

impl Default for MockGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGraphStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MockInner {
                nodes: RwLock::new(Vec::new()),
                edges: RwLock::new(Vec::new()),
                sessions_opened: AtomicUsize::new(0),
                fail_next_similar: AtomicBool::new(false),
                fail_category: AtomicBool::new(false),
            }),
        }
    }

    /// Adds a `Requirement` node with the given id, category and programs.
    pub fn add_requirement(
        &self,
        id: &str,
        category: &str,
        programs: &[&str],
        embedding: Option<Vec<f32>>,
    ) {
        let mut properties = Map::new();
        properties.insert("id".to_string(), json!(id));
        properties.insert("name".to_string(), json!(id));
        properties.insert("category".to_string(), json!(category));
        properties.insert("programs".to_string(), json!(programs));

        self.inner.nodes.write().push(StoredNode {
            node: GraphNode::new(None, vec!["Requirement".to_string()], properties),
            embedding,
        });
    }

    /// Adds an arbitrary labeled node.
    pub fn add_node(&self, id: &str, label: &str, properties: Map<String, Value>) {
        let mut props = properties;
        props.entry("id".to_string()).or_insert(json!(id));
        self.inner.nodes.write().push(StoredNode {
            node: GraphNode::new(None, vec![label.to_string()], props),
            embedding: None,
        });
    }

    /// Adds an arbitrary labeled node carrying a stored embedding.
    pub fn add_embedded_node(&self, id: &str, label: &str, embedding: Vec<f32>) {
        let mut props = Map::new();
        props.insert("id".to_string(), json!(id));
        self.inner.nodes.write().push(StoredNode {
            node: GraphNode::new(None, vec![label.to_string()], props),
            embedding: Some(embedding),
        });
    }

    /// Adds an undirected edge between two nodes by business id.
    pub fn add_edge(&self, from: &str, relationship: &str, to: &str) {
        self.inner
            .edges
            .write()
            .push((from.to_string(), relationship.to_string(), to.to_string()));
    }

    /// Makes the next `query_similar` call fail with a query error.
    pub fn fail_next_similar(&self) {
        self.inner.fail_next_similar.store(true, Ordering::SeqCst);
    }

    /// Makes every `query_by_category` call fail with a query error.
    pub fn fail_category(&self) {
        self.inner.fail_category.store(true, Ordering::SeqCst);
    }

    /// Number of sessions handed out so far.
    pub fn sessions_opened(&self) -> usize {
        self.inner.sessions_opened.load(Ordering::SeqCst)
    }
}

impl GraphStore for MockGraphStore {
    type Session = MockGraphSession;

    async fn session(&self) -> Result<MockGraphSession, GraphError> {
        self.inner.sessions_opened.fetch_add(1, Ordering::SeqCst);
        Ok(MockGraphSession {
            inner: Arc::clone(&self.inner),
        })
    }
}

pub struct MockGraphSession {
    inner: Arc<MockInner>,
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn node_programs(node: &GraphNode) -> Vec<String> {
    node.properties
        .get("programs")
        .and_then(Value::as_array)
        .map(|a| {
            a.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl GraphSession for MockGraphSession {
    async fn query_by_category(
        &self,
        categories: &[String],
        program: Option<&str>,
    ) -> Result<Vec<CategoryMatch>, GraphError> {
        if self.inner.fail_category.load(Ordering::SeqCst) {
            return Err(GraphError::QueryFailed {
                context: "category path",
                message: "injected failure".to_string(),
            });
        }

        let nodes = self.inner.nodes.read();
        let mut matches = Vec::new();
        for stored in nodes.iter() {
            if !stored.node.has_label("Requirement") {
                continue;
            }
            let category = stored.node.text_property("category").unwrap_or_default();
            if !categories.iter().any(|c| c == category) {
                continue;
            }

            let programs = node_programs(&stored.node);
            if let Some(program) = program {
                let wanted = program.to_lowercase();
                let hit = programs.iter().any(|p| {
                    let p = p.to_lowercase();
                    p.contains(&wanted) || wanted.contains(&p)
                });
                if !hit {
                    continue;
                }
            }

            matches.push(CategoryMatch {
                node: stored.node.clone(),
                programs,
            });
        }
        Ok(matches)
    }

    async fn query_similar(
        &self,
        embedding: &[f32],
        threshold: f32,
        top_k: usize,
    ) -> Result<Vec<GraphNode>, GraphError> {
        if self.inner.fail_next_similar.swap(false, Ordering::SeqCst) {
            return Err(GraphError::QueryFailed {
                context: "semantic path",
                message: "injected failure".to_string(),
            });
        }

        let nodes = self.inner.nodes.read();
        let mut scored: Vec<(f32, GraphNode)> = nodes
            .iter()
            .filter_map(|stored| {
                let vector = stored.embedding.as_ref()?;
                let similarity = cosine(embedding, vector);
                (similarity >= threshold).then(|| (similarity, stored.node.clone()))
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        // Like the bolt query, only requirement nodes come back: the similar
        // node itself when it is one, plus any requirement it links to.
        let edges = self.inner.edges.read();
        let mut results: Vec<GraphNode> = Vec::new();
        let mut seen: Vec<String> = Vec::new();
        let mut keep = |node: GraphNode| {
            let key = node.business_id().unwrap_or_default().to_string();
            if !seen.contains(&key) {
                seen.push(key);
                results.push(node);
            }
        };

        for (_, node) in &scored {
            if node.has_label("Requirement") {
                keep(node.clone());
            }
            let Some(id) = node.business_id() else {
                continue;
            };
            for (from, _, to) in edges.iter() {
                let other = if from == id {
                    to
                } else if to == id {
                    from
                } else {
                    continue;
                };
                let linked = nodes
                    .iter()
                    .find(|stored| stored.node.business_id() == Some(other.as_str()))
                    .filter(|stored| stored.node.has_label("Requirement"));
                if let Some(stored) = linked {
                    keep(stored.node.clone());
                }
            }
        }

        Ok(results)
    }

    async fn traverse_neighbors(
        &self,
        node_ref: &str,
        _max_hops: u32,
    ) -> Result<Vec<(String, GraphNode)>, GraphError> {
        let edges = self.inner.edges.read();
        let nodes = self.inner.nodes.read();

        let lookup = |id: &str| {
            nodes
                .iter()
                .find(|stored| stored.node.business_id() == Some(id))
                .map(|stored| stored.node.clone())
        };

        let mut neighbors = Vec::new();
        for (from, relationship, to) in edges.iter() {
            let other = if from == node_ref {
                to
            } else if to == node_ref {
                from
            } else {
                continue;
            };
            if let Some(node) = lookup(other) {
                neighbors.push((relationship.clone(), node));
            }
        }
        Ok(neighbors)
    }
}
