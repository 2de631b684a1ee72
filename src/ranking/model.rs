use serde::{Deserialize, Serialize};

use crate::graph::GraphNode;
use crate::retrieval::RequirementRecord;

/// How per-query-text similarity scores collapse into one candidate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reducer {
    /// Highest similarity across query texts.
    #[default]
    Max,
    /// Mean similarity across query texts.
    Avg,
}

impl Reducer {
    pub fn reduce(&self, scores: &[f32]) -> f32 {
        if scores.is_empty() {
            return 0.0;
        }
        match self {
            Reducer::Max => scores.iter().copied().fold(0.0, f32::max),
            Reducer::Avg => scores.iter().sum::<f32>() / scores.len() as f32,
        }
    }
}

/// Depth-1 neighborhood of a ranked requirement, bucketed by node type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectedNodeBundle {
    pub conditions: Vec<GraphNode>,
    pub dependencies: Vec<GraphNode>,
    pub related_requirements: Vec<GraphNode>,
    pub other: Vec<GraphNode>,
}

impl ConnectedNodeBundle {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
            && self.dependencies.is_empty()
            && self.related_requirements.is_empty()
            && self.other.is_empty()
    }

    /// Routes a neighbor into its bucket by label.
    pub fn push(&mut self, node: GraphNode) {
        if node.has_label("Condition") {
            self.conditions.push(node);
        } else if node.has_label("Dependency") || node.has_label("Dependencies") {
            self.dependencies.push(node);
        } else if node.has_label("Requirement") {
            self.related_requirements.push(node);
        } else {
            self.other.push(node);
        }
    }
}

/// A candidate requirement with its similarity score and enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRequirement {
    pub record: RequirementRecord,
    /// Reduced, clamped similarity in `[0, 1]`.
    pub score: f32,
    /// Depth-1 connected nodes (empty when enrichment was skipped or failed).
    pub connected: ConnectedNodeBundle,
}
