//! Deterministic detection-confidence scoring.
//!
//! Five sub-scores over the evidence attached to a detection result,
//! combined by the configured weights. No I/O, no randomness: the same
//! record and config always produce the same confidence.

use super::config::ScoringConfig;
use super::types::{ConfidenceBreakdown, DeficiencyRecord, DetectionConfidence, round3};

/// Computes the weighted detection confidence for one record.
pub fn calculate_detection_confidence(
    record: &DeficiencyRecord,
    config: &ScoringConfig,
) -> DetectionConfidence {
    let weights = &config.detection_confidence_weights;

    let evidence_completeness = score_evidence_completeness(record);
    let deficiency_count_score = score_deficiency_count(record, config);
    let field_specificity = score_field_specificity(record);
    let evidence_type = score_evidence_type(record, config);
    let reasoning_quality = score_reasoning_quality(record);

    let overall = evidence_completeness * weights.evidence_completeness
        + deficiency_count_score * weights.deficiency_count
        + field_specificity * weights.field_specificity
        + evidence_type * weights.evidence_type
        + reasoning_quality * weights.reasoning_quality;

    DetectionConfidence {
        overall: round3(overall),
        breakdown: ConfidenceBreakdown {
            evidence_completeness: round3(evidence_completeness),
            deficiency_count_score: round3(deficiency_count_score),
            field_specificity: round3(field_specificity),
            evidence_type: round3(evidence_type),
            reasoning_quality: round3(reasoning_quality),
        },
    }
}

/// Fraction of the four required evidence fields present across all listed
/// deficiencies. A record with no itemized deficiencies floors at 0.2.
pub fn score_evidence_completeness(record: &DeficiencyRecord) -> f64 {
    if record.deficiencies.is_empty() {
        return 0.2;
    }

    let total = record.deficiencies.len() * 4;
    let present: usize = record
        .deficiencies
        .iter()
        .map(|d| {
            [&d.requirement, &d.issue, &d.field_checked, &d.evidence]
                .iter()
                .filter(|f| !f.is_empty())
                .count()
        })
        .sum();

    present as f64 / total as f64
}

/// More itemized deficiencies means higher confidence the condition really
/// is deficient. Zero itemized scores a fixed 0.3.
pub fn score_deficiency_count(record: &DeficiencyRecord, config: &ScoringConfig) -> f64 {
    let scores = &config.deficiency_count_scores;
    match record.deficiencies.len() {
        0 => 0.3,
        1 => scores.one,
        2 => scores.two,
        _ => scores.three_plus,
    }
}

const SPECIFIC_INDICATORS: [&str; 7] = [".", "[", "]", "_", "line", "schedule", "form"];

fn is_specific(field: &str) -> bool {
    let field = field.to_lowercase();
    SPECIFIC_INDICATORS.iter().any(|ind| field.contains(ind))
}

/// Scores how precise the field references are. Structured paths like
/// `scheduleGPartII[].percentageOwned` count as specific; bare words like
/// `document` do not.
pub fn score_field_specificity(record: &DeficiencyRecord) -> f64 {
    if record.checked_fields.is_empty() && record.deficiencies.is_empty() {
        return 0.2;
    }

    let mut total = record.checked_fields.len();
    let mut specific = record.checked_fields.iter().filter(|f| is_specific(f)).count();

    for deficiency in &record.deficiencies {
        if !deficiency.field_checked.is_empty() {
            total += 1;
            if is_specific(&deficiency.field_checked) {
                specific += 1;
            }
        }
    }

    if total == 0 {
        return 0.3;
    }

    let ratio = specific as f64 / total as f64;
    if ratio >= 0.8 {
        1.0
    } else if ratio >= 0.5 {
        0.7
    } else {
        0.4
    }
}

/// Classifies each deficiency's evidence as missing data vs wrong data.
///
/// Missing data with an empty-array marker (`[]`) is the strongest signal;
/// wrong data (invalid or mismatched values) ranks above plain missing; text
/// matching neither keyword set scores the unclear default. Reasoning text
/// mentioning a missing keyword appends one extra missing-biased sample.
pub fn score_evidence_type(record: &DeficiencyRecord, config: &ScoringConfig) -> f64 {
    if record.deficiencies.is_empty() {
        return 0.3;
    }

    let keywords = &config.evidence_type_keywords;
    let scores = &config.evidence_type_scores;

    let mut samples = Vec::with_capacity(record.deficiencies.len() + 1);
    for deficiency in &record.deficiencies {
        let combined = format!(
            "{} {}",
            deficiency.issue.to_lowercase(),
            deficiency.evidence.to_lowercase()
        );
        let is_missing = keywords.missing.iter().any(|k| combined.contains(k.as_str()));
        let is_wrong = keywords.wrong.iter().any(|k| combined.contains(k.as_str()));

        let score = if is_missing && combined.contains("[]") {
            scores.empty_array
        } else if is_missing {
            scores.missing_required
        } else if is_wrong {
            scores.wrong_value
        } else {
            scores.unclear
        };
        samples.push(score);
    }

    let reasoning = record.reasoning.to_lowercase();
    if keywords.missing.iter().any(|k| reasoning.contains(k.as_str())) {
        samples.push(scores.missing_required);
    }

    samples.iter().sum::<f64>() / samples.len() as f64
}

const STRUCTURE_INDICATORS: [&str; 7] = [
    "because", "since", "therefore", "however", "should", "must", "would",
];

/// Scores reasoning text: 70% length tiers, 30% presence of argumentative
/// connectives (capped at three).
pub fn score_reasoning_quality(record: &DeficiencyRecord) -> f64 {
    if record.reasoning.is_empty() {
        return 0.1;
    }

    let length = record.reasoning.chars().count();
    let length_score = if length < 50 {
        0.3
    } else if length < 150 {
        0.5
    } else if length < 300 {
        0.7
    } else {
        1.0
    };

    let reasoning = record.reasoning.to_lowercase();
    let structure_count = STRUCTURE_INDICATORS
        .iter()
        .filter(|ind| reasoning.contains(*ind))
        .count();
    let structure_score = (structure_count as f64 / 3.0).min(1.0);

    length_score * 0.7 + structure_score * 0.3
}
