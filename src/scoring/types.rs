use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Detection verdict for a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeficiencyStatus {
    Deficient,
    Satisfied,
    NotApplicable,
    #[serde(other)]
    Unknown,
}

/// One concrete deficiency inside a detection result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deficiency {
    #[serde(default)]
    pub requirement: String,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub field_checked: String,
    #[serde(default)]
    pub evidence: String,
}

/// A detection result for one condition, as produced upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeficiencyRecord {
    #[serde(default)]
    pub condition_id: String,
    pub status: DeficiencyStatus,
    #[serde(default)]
    pub deficiencies: Vec<Deficiency>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub checked_fields: Vec<String>,
    #[serde(default)]
    pub related_documents: String,
    #[serde(default)]
    pub actionable_instruction: String,
    #[serde(default)]
    pub documents_checked: Vec<String>,
    #[serde(default)]
    pub satisfied_by: Option<String>,
    /// Upstream fields we carry through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Per-component breakdown of the detection confidence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub evidence_completeness: f64,
    pub deficiency_count_score: f64,
    pub field_specificity: f64,
    pub evidence_type: f64,
    pub reasoning_quality: f64,
}

/// Weighted detection confidence with its breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfidence {
    pub overall: f64,
    pub breakdown: ConfidenceBreakdown,
}

/// LLM-evaluated priority dimensions, each in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityScore {
    pub severity: f64,
    pub impact: f64,
    pub urgency: f64,
    pub complexity: f64,
    #[serde(default)]
    pub explanation: String,
    pub overall_priority: f64,
}

impl PriorityScore {
    /// Medium-everything fallback used when evaluation fails.
    pub fn neutral(explanation: impl Into<String>) -> Self {
        Self {
            severity: 0.5,
            impact: 0.5,
            urgency: 0.5,
            complexity: 0.5,
            explanation: explanation.into(),
            overall_priority: 0.5,
        }
    }
}

/// One fully scored deficiency, ready for ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDeficiency {
    pub condition_id: String,
    pub status: DeficiencyStatus,
    pub detection_confidence: f64,
    pub confidence_breakdown: ConfidenceBreakdown,
    pub priority_score: f64,
    pub priority_dimensions: PriorityScore,
    pub related_documents: String,
    pub actionable_documents: String,
    pub actionable_instruction: String,
    pub documents_checked: Vec<String>,
    pub satisfied_by: Option<String>,
    pub original: DeficiencyRecord,
}

/// Distribution stats over one scoring run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub total_deficiencies_evaluated: usize,
    pub average_detection_confidence: f64,
    pub average_priority_score: f64,
    pub high_priority_count: usize,
    pub medium_priority_count: usize,
    pub low_priority_count: usize,
}

/// Full output of a scoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub scored_deficiencies: Vec<ScoredDeficiency>,
    pub top_n: Vec<ScoredDeficiency>,
    pub summary: ScoreSummary,
}

/// Rounds to three decimals, the precision reported everywhere.
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
