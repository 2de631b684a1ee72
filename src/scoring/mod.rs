//! Deficiency scoring and priority ranking.
//!
//! Two signals per deficiency: a deterministic detection confidence built
//! from evidence-quality heuristics, and an LLM-evaluated priority over
//! severity, impact, urgency and (inverted) complexity. Deficiencies are
//! ranked by priority and bucketed into high / medium / low.

pub mod config;
pub mod confidence;
pub mod documents;
pub mod error;
pub mod priority;
pub mod ranker;
pub mod types;


pub use config::{
    ConfidenceWeights, CountScores, EvidenceTypeKeywords, EvidenceTypeScores, PriorityWeights,
    ScoringConfig,
};
pub use confidence::calculate_detection_confidence;
pub use documents::extract_actionable_documents;
pub use error::ScoringError;
pub use priority::{PriorityEvaluator, PriorityOutcome};
pub use ranker::{DeficiencyRanker, HIGH_PRIORITY_THRESHOLD, LOW_PRIORITY_THRESHOLD};
pub use types::{
    ConfidenceBreakdown, Deficiency, DeficiencyRecord, DeficiencyStatus, DetectionConfidence,
    PriorityScore, ScoreReport, ScoreSummary, ScoredDeficiency,
};
