//! Run-level plumbing shared by the bin: entity keyword extraction from
//! classified documents, and the JSON envelope a run is reported in.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::generation::TokenUsage;
use crate::scoring::ScoreReport;

/// Flattens a document classification plus its extracted-entity map into the
/// keyword list the retriever's semantic path consumes.
///
/// Keywords are the classification itself, every field path (dotted for
/// nested maps), and every non-empty string leaf value. Duplicates are
/// dropped, first occurrence wins.
pub fn extract_entity_keywords(classification: &str, extracted_entities: &Value) -> Vec<String> {
    let mut keywords = Vec::new();
    let mut push = |candidate: String| {
        let candidate = candidate.trim().to_string();
        if !candidate.is_empty() && !keywords.contains(&candidate) {
            keywords.push(candidate);
        }
    };

    push(classification.to_string());

    fn walk(value: &Value, prefix: &str, push: &mut impl FnMut(String)) {
        if let Value::Object(map) = value {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                push(path.clone());
                match child {
                    Value::Object(_) => walk(child, &path, push),
                    Value::String(s) => push(s.clone()),
                    _ => {}
                }
            }
        }
    }

    walk(extracted_entities, "", &mut push);
    keywords
}

/// Wall-clock latency of each pipeline stage, in milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageLatencies {
    pub scoring_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking_ms: Option<u64>,
}

/// Token totals across all completion calls in a run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenTotals {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub grand_total: u64,
}

impl From<TokenUsage> for TokenTotals {
    fn from(usage: TokenUsage) -> Self {
        Self {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            grand_total: usage.input_tokens + usage.output_tokens,
        }
    }
}

/// Envelope for one scoring run, persisted as the bin's output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub latencies: StageLatencies,
    pub tokens: TokenTotals,
    #[serde(flatten)]
    pub report: ScoreReport,
}

impl RunReport {
    pub fn new(
        started_at: DateTime<Utc>,
        scoring_elapsed: Duration,
        usage: TokenUsage,
        report: ScoreReport,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now(),
            latencies: StageLatencies {
                scoring_ms: scoring_elapsed.as_millis() as u64,
                retrieval_ms: None,
                ranking_ms: None,
            },
            tokens: usage.into(),
            report,
        }
    }
}
