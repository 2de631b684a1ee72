use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A node as it crosses the boundary from the external store into the core.
///
/// Properties are a validated JSON map; the store-internal element id and the
/// type labels travel alongside. Anything deeper in the pipeline works with
/// typed records converted from this shape, never with raw driver types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphNode {
    /// Store-internal element id, when the store provides one.
    pub element_id: Option<String>,
    /// Type labels (e.g. `Requirement`, `Condition`).
    pub labels: Vec<String>,
    /// Property map. The `embedding` property, when present, is stripped into
    /// a dedicated field by [`GraphNode::take_embedding`] so serialized
    /// records do not carry multi-thousand-element vectors.
    pub properties: Map<String, Value>,
}

impl GraphNode {
    /// Creates a node from parts.
    pub fn new(
        element_id: Option<String>,
        labels: Vec<String>,
        properties: Map<String, Value>,
    ) -> Self {
        Self {
            element_id,
            labels,
            properties,
        }
    }

    /// Returns the business identity: the `id` property, falling back to `name`.
    pub fn business_id(&self) -> Option<&str> {
        self.text_property("id").or_else(|| self.text_property("name"))
    }

    /// Returns a string property by key.
    pub fn text_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Returns `true` if any label equals `label`.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Removes and returns the stored embedding vector, if any.
    ///
    /// Non-numeric array elements invalidate the whole vector (treated as
    /// absent rather than partially decoded).
    pub fn take_embedding(&mut self) -> Option<Vec<f32>> {
        let value = self.properties.remove("embedding")?;
        let array = value.as_array()?;

        let mut vector = Vec::with_capacity(array.len());
        for item in array {
            vector.push(item.as_f64()? as f32);
        }

        Some(vector)
    }
}

/// A category-path match: the requirement node plus the owning program names
/// observed on its incoming edges (possibly empty).
#[derive(Debug, Clone)]
pub struct CategoryMatch {
    /// The requirement node.
    pub node: GraphNode,
    /// Names of programs this requirement belongs to.
    pub programs: Vec<String>,
}
