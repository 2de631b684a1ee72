use std::collections::HashMap;

use neo4rs::{ConfigBuilder, Graph, query};
use serde_json::{Map, Value};
use tracing::debug;

use super::error::GraphError;
use super::node::{CategoryMatch, GraphNode};

/// Handle to the knowledge-graph store.
///
/// A store hands out [`GraphSession`]s; a session is the unit given to a
/// concurrent task. Sessions are never shared across tasks, so the underlying
/// driver connection is free to be non-thread-safe.
pub trait GraphStore: Send + Sync {
    /// Session type handed to tasks.
    type Session: GraphSession + Send + 'static;

    /// Acquires an independent session.
    fn session(
        &self,
    ) -> impl std::future::Future<Output = Result<Self::Session, GraphError>> + Send;
}

/// Query surface the core needs from the store.
pub trait GraphSession: Send + Sync {
    /// Returns requirement nodes whose category is in `categories`, each with
    /// the owning program names observed. When `program` is given, first
    /// resolves it by case-insensitive substring match in either direction
    /// and restricts results to requirements reachable from that program.
    fn query_by_category(
        &self,
        categories: &[String],
        program: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<CategoryMatch>, GraphError>> + Send;

    /// Returns requirement nodes reachable within 2 hops of nodes whose
    /// stored embedding has cosine similarity >= `threshold` to `embedding`,
    /// ranked by similarity and truncated to `top_k` similar nodes.
    fn query_similar(
        &self,
        embedding: &[f32],
        threshold: f32,
        top_k: usize,
    ) -> impl std::future::Future<Output = Result<Vec<GraphNode>, GraphError>> + Send;

    /// Returns `(relationship_type, neighbor)` pairs within `max_hops` of the
    /// node identified by `node_ref` (element id, business id, or name).
    fn traverse_neighbors(
        &self,
        node_ref: &str,
        max_hops: u32,
    ) -> impl std::future::Future<Output = Result<Vec<(String, GraphNode)>, GraphError>> + Send;
}

const CATEGORY_QUERY: &str = "
MATCH (req:Requirement)
WHERE req.category IN $categories
OPTIONAL MATCH (program)-[]->(req)
WHERE program.name IS NOT NULL
RETURN req, elementId(req) AS element_id, collect(DISTINCT program.name) AS programs
";

const CATEGORY_PROGRAM_QUERY: &str = "
MATCH (program)
WHERE program.name IS NOT NULL
  AND (toLower(program.name) CONTAINS toLower($program)
       OR toLower($program) CONTAINS toLower(program.name))
MATCH (program)-[]->(req:Requirement)
WHERE req.category IN $categories
RETURN DISTINCT req, elementId(req) AS element_id, program.name AS program_name
";

const SIMILAR_QUERY: &str = "
MATCH (n)
WHERE n.embedding IS NOT NULL
WITH n, gds.similarity.cosine(n.embedding, $embedding) AS similarity
WHERE similarity >= $threshold
ORDER BY similarity DESC
LIMIT $top_k
WITH n
MATCH (n)-[*1..2]-(req:Requirement)
RETURN DISTINCT req, elementId(req) AS element_id
";

const NEIGHBOR_QUERY: &str = "
MATCH (req:Requirement)
WHERE elementId(req) = $node_ref
   OR req.id = $node_ref
   OR req.name = $node_ref
MATCH (req)-[r]-(connected)
RETURN type(r) AS relationship_type, connected, elementId(connected) AS element_id
";

#[derive(Clone)]
/// Neo4j-backed [`GraphStore`].
pub struct Neo4jStore {
    graph: Graph,
    uri: String,
}

impl Neo4jStore {
    /// Connects to the bolt endpoint at `uri`.
    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self, GraphError> {
        let config = ConfigBuilder::default()
            .uri(uri)
            .user(user)
            .password(password)
            .build()
            .map_err(|e| GraphError::ConnectionFailed {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;

        let graph = Graph::connect(config)
            .await
            .map_err(|e| GraphError::ConnectionFailed {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            graph,
            uri: uri.to_string(),
        })
    }

    /// Returns the configured URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl GraphStore for Neo4jStore {
    type Session = Neo4jSession;

    async fn session(&self) -> Result<Neo4jSession, GraphError> {
        // Each session clone checks connections out of the driver pool
        // independently; queries issued through different sessions never
        // share a connection.
        Ok(Neo4jSession {
            graph: self.graph.clone(),
        })
    }
}

/// One pooled-connection view of a [`Neo4jStore`].
pub struct Neo4jSession {
    graph: Graph,
}

fn node_from_row(
    row: &neo4rs::Row,
    node_key: &str,
    context: &'static str,
) -> Result<GraphNode, GraphError> {
    let node: neo4rs::Node = row.get(node_key).map_err(|e| GraphError::DecodeFailed {
        context,
        message: e.to_string(),
    })?;

    let labels: Vec<String> = node.labels().iter().map(|l| l.to_string()).collect();

    let properties: HashMap<String, Value> =
        node.to().map_err(|e| GraphError::DecodeFailed {
            context,
            message: e.to_string(),
        })?;

    let element_id: Option<String> = row.get("element_id").ok();

    Ok(GraphNode::new(
        element_id,
        labels,
        properties.into_iter().collect::<Map<String, Value>>(),
    ))
}

fn embedding_to_f64(embedding: &[f32]) -> Vec<f64> {
    embedding.iter().map(|v| *v as f64).collect()
}

impl GraphSession for Neo4jSession {
    async fn query_by_category(
        &self,
        categories: &[String],
        program: Option<&str>,
    ) -> Result<Vec<CategoryMatch>, GraphError> {
        const CONTEXT: &str = "category path";

        let q = match program {
            Some(program) => query(CATEGORY_PROGRAM_QUERY)
                .param("categories", categories.to_vec())
                .param("program", program),
            None => query(CATEGORY_QUERY).param("categories", categories.to_vec()),
        };

        let mut stream = self
            .graph
            .execute(q)
            .await
            .map_err(|e| GraphError::QueryFailed {
                context: CONTEXT,
                message: e.to_string(),
            })?;

        let mut matches = Vec::new();
        while let Some(row) = stream.next().await.map_err(|e| GraphError::QueryFailed {
            context: CONTEXT,
            message: e.to_string(),
        })? {
            let node = node_from_row(&row, "req", CONTEXT)?;

            let programs = if program.is_some() {
                row.get::<String>("program_name")
                    .ok()
                    .map(|p| vec![p])
                    .unwrap_or_default()
            } else {
                row.get::<Vec<String>>("programs").unwrap_or_default()
            };

            matches.push(CategoryMatch { node, programs });
        }

        debug!(count = matches.len(), "category path query complete");
        Ok(matches)
    }

    async fn query_similar(
        &self,
        embedding: &[f32],
        threshold: f32,
        top_k: usize,
    ) -> Result<Vec<GraphNode>, GraphError> {
        const CONTEXT: &str = "semantic path";

        let q = query(SIMILAR_QUERY)
            .param("embedding", embedding_to_f64(embedding))
            .param("threshold", threshold as f64)
            .param("top_k", top_k as i64);

        let mut stream = self
            .graph
            .execute(q)
            .await
            .map_err(|e| GraphError::QueryFailed {
                context: CONTEXT,
                message: e.to_string(),
            })?;

        let mut nodes = Vec::new();
        while let Some(row) = stream.next().await.map_err(|e| GraphError::QueryFailed {
            context: CONTEXT,
            message: e.to_string(),
        })? {
            nodes.push(node_from_row(&row, "req", CONTEXT)?);
        }

        Ok(nodes)
    }

    async fn traverse_neighbors(
        &self,
        node_ref: &str,
        max_hops: u32,
    ) -> Result<Vec<(String, GraphNode)>, GraphError> {
        const CONTEXT: &str = "neighbor traversal";

        // Depth 1 is the only traversal the enrichment stage uses; deeper
        // traversal happens inside SIMILAR_QUERY's fixed [*1..2] pattern.
        debug_assert!(max_hops == 1, "only depth-1 traversal is supported");
        let _ = max_hops;

        let q = query(NEIGHBOR_QUERY).param("node_ref", node_ref);

        let mut stream = self
            .graph
            .execute(q)
            .await
            .map_err(|e| GraphError::QueryFailed {
                context: CONTEXT,
                message: e.to_string(),
            })?;

        let mut neighbors = Vec::new();
        while let Some(row) = stream.next().await.map_err(|e| GraphError::QueryFailed {
            context: CONTEXT,
            message: e.to_string(),
        })? {
            let relation: String =
                row.get("relationship_type")
                    .map_err(|e| GraphError::DecodeFailed {
                        context: CONTEXT,
                        message: e.to_string(),
                    })?;
            let node = node_from_row(&row, "connected", CONTEXT)?;
            neighbors.push((relation, node));
        }

        Ok(neighbors)
    }
}
