use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graph::{CategoryMatch, GraphNode};

/// A requirement pulled out of the graph, keyed for dedup across paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementRecord {
    /// Stable identity used for dedup and intersection.
    pub key: String,
    /// The underlying node (embedding stripped).
    pub node: GraphNode,
    /// Stored embedding, when the node carried one.
    #[serde(skip)]
    pub embedding: Option<Vec<f32>>,
    /// Program names the requirement was matched under, if any.
    pub programs: Vec<String>,
}

impl RequirementRecord {
    /// Builds a record from a raw node. The key is the node's business id;
    /// nodes without one get a content digest so two property-identical
    /// anonymous nodes still collapse to a single candidate.
    pub fn from_node(mut node: GraphNode, programs: Vec<String>) -> Self {
        let embedding = node.take_embedding();
        let key = match node.business_id() {
            Some(id) => id.to_string(),
            None => {
                let serialized =
                    serde_json::to_string(&node.properties).unwrap_or_default();
                blake3::hash(serialized.as_bytes()).to_hex().to_string()
            }
        };
        Self {
            key,
            node,
            embedding,
            programs,
        }
    }

    pub fn from_category_match(m: CategoryMatch) -> Self {
        Self::from_node(m.node, m.programs)
    }

    /// Text used for similarity ranking: `description`, then `text`, then
    /// `name`, then empty.
    pub fn ranking_text(&self) -> &str {
        self.node
            .text_property("description")
            .or_else(|| self.node.text_property("text"))
            .or_else(|| self.node.text_property("name"))
            .unwrap_or_default()
    }

    /// Convenience property accessor.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.node.properties.get(key)
    }
}

/// Ordered, deduplicated set of requirement records.
///
/// Insertion order is preserved; a key seen twice keeps its first record but
/// merges any newly observed program names.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    records: Vec<RequirementRecord>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, merging programs on duplicate keys.
    pub fn insert(&mut self, record: RequirementRecord) {
        match self.records.iter_mut().find(|r| r.key == record.key) {
            Some(existing) => {
                for program in record.programs {
                    if !existing.programs.contains(&program) {
                        existing.programs.push(program);
                    }
                }
            }
            None => self.records.push(record),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.iter().any(|r| r.key == key)
    }

    /// Keeps only records whose key satisfies `predicate`.
    pub fn retain<F: FnMut(&str) -> bool>(&mut self, mut predicate: F) {
        self.records.retain(|r| predicate(&r.key));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequirementRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<RequirementRecord> {
        self.records
    }
}

impl FromIterator<RequirementRecord> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = RequirementRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}
