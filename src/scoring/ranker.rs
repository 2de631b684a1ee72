use std::cmp::Ordering;

use tracing::{debug, info};

use crate::generation::{CompletionClient, TokenUsage};

use super::config::ScoringConfig;
use super::confidence::calculate_detection_confidence;
use super::documents::extract_actionable_documents;
use super::priority::PriorityEvaluator;
use super::types::{
    DeficiencyRecord, DeficiencyStatus, ScoreReport, ScoreSummary, ScoredDeficiency, round3,
};

/// Summary bucket thresholds: high at and above 0.7, low below 0.4.
pub const HIGH_PRIORITY_THRESHOLD: f64 = 0.7;
pub const LOW_PRIORITY_THRESHOLD: f64 = 0.4;

/// Scores detection results and ranks them by priority.
///
/// Confidence is deterministic; priority is one LLM call per deficiency,
/// evaluated sequentially so the provider sees a steady request rate.
pub struct DeficiencyRanker<C> {
    config: ScoringConfig,
    evaluator: PriorityEvaluator<C>,
}

impl<C: CompletionClient> DeficiencyRanker<C> {
    pub fn new(config: ScoringConfig, client: C) -> Self {
        let evaluator = PriorityEvaluator::new(client, config.priority_score_weights.clone());
        Self { config, evaluator }
    }

    /// Scores every deficient record and returns the full report plus the
    /// token usage the priority calls consumed.
    pub async fn score_all(
        &self,
        records: Vec<DeficiencyRecord>,
        top_n: usize,
    ) -> (ScoreReport, TokenUsage) {
        let deficient: Vec<DeficiencyRecord> = records
            .into_iter()
            .filter(|r| r.status == DeficiencyStatus::Deficient)
            .collect();

        info!(count = deficient.len(), "scoring deficiencies");

        if deficient.is_empty() {
            return (
                ScoreReport {
                    scored_deficiencies: Vec::new(),
                    top_n: Vec::new(),
                    summary: ScoreSummary::default(),
                },
                TokenUsage::default(),
            );
        }

        let mut usage = TokenUsage::default();
        let mut scored = Vec::with_capacity(deficient.len());
        for record in deficient {
            let (item, item_usage) = self.score_single(record).await;
            usage.input_tokens += item_usage.input_tokens;
            usage.output_tokens += item_usage.output_tokens;
            scored.push(item);
        }

        scored.sort_by(|a, b| {
            b.priority_score
                .partial_cmp(&a.priority_score)
                .unwrap_or(Ordering::Equal)
        });

        let summary = summarize(&scored);
        let top = scored.iter().take(top_n).cloned().collect();

        (
            ScoreReport {
                scored_deficiencies: scored,
                top_n: top,
                summary,
            },
            usage,
        )
    }

    /// Scores one record: confidence first, then priority (which sees the
    /// confidence), then document extraction.
    pub async fn score_single(&self, record: DeficiencyRecord) -> (ScoredDeficiency, TokenUsage) {
        let confidence = calculate_detection_confidence(&record, &self.config);
        debug!(
            condition = %record.condition_id,
            confidence = confidence.overall,
            "detection confidence computed"
        );

        let outcome = self.evaluator.evaluate(&record, confidence.overall).await;

        let actionable_documents = extract_actionable_documents(
            &record.actionable_instruction,
            &record.related_documents,
        );

        let item = ScoredDeficiency {
            condition_id: record.condition_id.clone(),
            status: record.status,
            detection_confidence: confidence.overall,
            confidence_breakdown: confidence.breakdown,
            priority_score: outcome.score.overall_priority,
            priority_dimensions: outcome.score,
            related_documents: record.related_documents.clone(),
            actionable_documents,
            actionable_instruction: record.actionable_instruction.clone(),
            documents_checked: record.documents_checked.clone(),
            satisfied_by: record.satisfied_by.clone(),
            original: record,
        };

        (item, outcome.usage)
    }
}

fn summarize(scored: &[ScoredDeficiency]) -> ScoreSummary {
    let total = scored.len();
    if total == 0 {
        return ScoreSummary::default();
    }

    let avg_confidence =
        scored.iter().map(|d| d.detection_confidence).sum::<f64>() / total as f64;
    let avg_priority = scored.iter().map(|d| d.priority_score).sum::<f64>() / total as f64;

    ScoreSummary {
        total_deficiencies_evaluated: total,
        average_detection_confidence: round3(avg_confidence),
        average_priority_score: round3(avg_priority),
        high_priority_count: scored
            .iter()
            .filter(|d| d.priority_score >= HIGH_PRIORITY_THRESHOLD)
            .count(),
        medium_priority_count: scored
            .iter()
            .filter(|d| {
                d.priority_score >= LOW_PRIORITY_THRESHOLD
                    && d.priority_score < HIGH_PRIORITY_THRESHOLD
            })
            .count(),
        low_priority_count: scored
            .iter()
            .filter(|d| d.priority_score < LOW_PRIORITY_THRESHOLD)
            .count(),
    }
}
