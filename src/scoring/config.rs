use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::ScoringError;

/// Weights and lookup tables driving deterministic confidence scoring and
/// the priority aggregate. Loaded from JSON; every field has a default so a
/// partial file overrides only what it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub detection_confidence_weights: ConfidenceWeights,
    pub priority_score_weights: PriorityWeights,
    pub deficiency_count_scores: CountScores,
    pub evidence_type_scores: EvidenceTypeScores,
    pub evidence_type_keywords: EvidenceTypeKeywords,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub evidence_completeness: f64,
    pub deficiency_count: f64,
    pub field_specificity: f64,
    pub evidence_type: f64,
    pub reasoning_quality: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    pub severity: f64,
    pub impact: f64,
    pub urgency: f64,
    pub complexity: f64,
}

/// Confidence contribution by number of listed deficiencies. Zero listed is
/// hardcoded to 0.3 (deficient status with nothing itemized).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CountScores {
    #[serde(rename = "1")]
    pub one: f64,
    #[serde(rename = "2")]
    pub two: f64,
    #[serde(rename = "3+")]
    pub three_plus: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceTypeScores {
    pub empty_array: f64,
    pub missing_required: f64,
    pub wrong_value: f64,
    pub unclear: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceTypeKeywords {
    pub missing: Vec<String>,
    pub wrong: Vec<String>,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            evidence_completeness: 0.25,
            deficiency_count: 0.15,
            field_specificity: 0.20,
            evidence_type: 0.20,
            reasoning_quality: 0.20,
        }
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            severity: 0.4,
            impact: 0.3,
            urgency: 0.2,
            complexity: 0.1,
        }
    }
}

impl Default for CountScores {
    fn default() -> Self {
        Self {
            one: 0.5,
            two: 0.8,
            three_plus: 1.0,
        }
    }
}

impl Default for EvidenceTypeScores {
    fn default() -> Self {
        Self {
            empty_array: 0.9,
            missing_required: 0.7,
            wrong_value: 0.8,
            unclear: 0.5,
        }
    }
}

impl Default for EvidenceTypeKeywords {
    fn default() -> Self {
        let to_vec = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            missing: to_vec(&[
                "missing", "empty", "null", "not found", "absent", "lacks", "blank",
                "no data", "not provided",
            ]),
            wrong: to_vec(&[
                "invalid", "incorrect", "wrong", "mismatch", "does not match",
                "inconsistent", "expired", "exceeds",
            ]),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            detection_confidence_weights: ConfidenceWeights::default(),
            priority_score_weights: PriorityWeights::default(),
            deficiency_count_scores: CountScores::default(),
            evidence_type_scores: EvidenceTypeScores::default(),
            evidence_type_keywords: EvidenceTypeKeywords::default(),
        }
    }
}

impl ScoringConfig {
    /// Loads a config file, then validates it.
    pub fn from_path(path: &Path) -> Result<Self, ScoringError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ScoringError::ConfigReadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self =
            serde_json::from_str(&raw).map_err(|e| ScoringError::ConfigParseFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.validate();
        Ok(config)
    }

    /// Warns about weight sets that do not sum to 1. Scoring still runs; the
    /// overall scores just leave the nominal `[0, 1]` calibration.
    pub fn validate(&self) {
        let w = &self.detection_confidence_weights;
        let confidence_sum = w.evidence_completeness
            + w.deficiency_count
            + w.field_specificity
            + w.evidence_type
            + w.reasoning_quality;
        if (confidence_sum - 1.0).abs() > 1e-6 {
            warn!(sum = confidence_sum, "detection confidence weights do not sum to 1");
        }

        let p = &self.priority_score_weights;
        let priority_sum = p.severity + p.impact + p.urgency + p.complexity;
        if (priority_sum - 1.0).abs() > 1e-6 {
            warn!(sum = priority_sum, "priority weights do not sum to 1");
        }
    }
}
