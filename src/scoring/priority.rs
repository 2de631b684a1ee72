//! LLM-based priority evaluation.
//!
//! One completion call per deficiency, asking for four dimensions in strict
//! JSON. Every failure mode (transport, empty response, unparseable JSON,
//! missing fields) degrades to the neutral medium priority rather than
//! failing the run.

use serde::Deserialize;
use tracing::warn;

use crate::generation::{CompletionClient, TokenUsage};

use super::config::PriorityWeights;
use super::types::{DeficiencyRecord, PriorityScore, round3};

const SYSTEM_PROMPT: &str =
    "You are a loan underwriting assistant that scores document compliance \
     deficiencies. You always answer with strict JSON and nothing else.";

/// A priority evaluation plus the tokens it cost.
#[derive(Debug, Clone)]
pub struct PriorityOutcome {
    pub score: PriorityScore,
    pub usage: TokenUsage,
}

pub struct PriorityEvaluator<C> {
    client: C,
    weights: PriorityWeights,
}

impl<C: CompletionClient> PriorityEvaluator<C> {
    pub fn new(client: C, weights: PriorityWeights) -> Self {
        Self { client, weights }
    }

    /// Evaluates one deficiency. Never fails: any error yields the neutral
    /// 0.5-everything score with the error recorded in the explanation.
    pub async fn evaluate(
        &self,
        record: &DeficiencyRecord,
        detection_confidence: f64,
    ) -> PriorityOutcome {
        let prompt = build_priority_prompt(record, detection_confidence);

        let completion = match self.client.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(completion) => completion,
            Err(error) => {
                warn!(condition = %record.condition_id, %error, "priority evaluation failed");
                return PriorityOutcome {
                    score: PriorityScore::neutral(format!("Error evaluating priority: {error}")),
                    usage: TokenUsage::default(),
                };
            }
        };

        let mut score = match parse_priority_response(&completion.text) {
            Some(dimensions) => dimensions,
            None => {
                warn!(condition = %record.condition_id, "unparseable priority response");
                PriorityScore::neutral("Error parsing response")
            }
        };

        score.overall_priority = round3(overall_priority(&score, &self.weights));

        PriorityOutcome {
            score,
            usage: completion.usage,
        }
    }
}

/// Weighted aggregate of the four dimensions. Complexity is inverted: an
/// easy fix raises the priority of acting on the deficiency.
pub fn overall_priority(score: &PriorityScore, weights: &PriorityWeights) -> f64 {
    score.severity * weights.severity
        + score.impact * weights.impact
        + score.urgency * weights.urgency
        + (1.0 - score.complexity) * weights.complexity
}

pub fn build_priority_prompt(record: &DeficiencyRecord, detection_confidence: f64) -> String {
    let mut deficiency_text = String::new();
    for (i, deficiency) in record.deficiencies.iter().enumerate() {
        deficiency_text.push_str(&format!(
            "\n{}. Requirement: {}\n   Issue: {}\n   Field: {}\n   Evidence: {}\n",
            i + 1,
            deficiency.requirement,
            deficiency.issue,
            deficiency.field_checked,
            deficiency.evidence,
        ));
    }

    format!(
        r#"Evaluate this loan underwriting deficiency for priority scoring.

DEFICIENCY INFORMATION:
Condition: {condition}
Status: deficient
Related Documents: {related}

Detection Confidence: {confidence:.2} (0=uncertain, 1=certain)
This indicates how confident the detection system is that this is truly deficient.

DEFICIENCIES FOUND:{deficiencies}

REASONING:
{reasoning}

SCORING INSTRUCTIONS:
Rate each dimension from 0.0 to 1.0 based on the loan underwriting context:

1. SEVERITY: How critical is this to loan approval?
   - 0.9-1.0: Deal cannot close, regulatory violation, legal requirement
   - 0.6-0.8: Significant risk, underwriting concern, delays likely
   - 0.3-0.5: Minor issue, can be resolved with documentation
   - 0.0-0.2: Trivial, best practice only, optional

2. IMPACT: What are the consequences if NOT resolved?
   - 0.9-1.0: Legal/regulatory risk, cannot fund loan, investor rejection
   - 0.6-0.8: Financial risk, requires additional verification, guideline violation
   - 0.3-0.5: Process delay, manual review needed
   - 0.0-0.2: Minor inconvenience, documentation preference

3. URGENCY: How time-sensitive is this?
   - 0.9-1.0: Immediate blocker, must resolve before proceeding
   - 0.6-0.8: Needed before closing, prior to funding
   - 0.3-0.5: Post-closing acceptable with conditions
   - 0.0-0.2: Can be deferred, no immediate timeline

4. COMPLEXITY: How difficult is remediation?
   - 0.9-1.0: Very difficult, requires multiple parties, lengthy process
   - 0.6-0.8: Moderate effort, coordination needed, multiple documents
   - 0.3-0.5: Straightforward, clear process, single request
   - 0.0-0.2: Easy fix, quick request, readily available

IMPORTANT CONTEXT:
- Missing signatures on tax returns = HIGH severity (required for loan approval)
- Ownership verification = HIGH-MEDIUM severity (guideline requirement)
- Missing optional documentation = LOW severity
- Empty arrays/missing data = Consider if it's required or optional

Return ONLY valid JSON in this exact format:
{{
  "severity": 0.0-1.0,
  "impact": 0.0-1.0,
  "urgency": 0.0-1.0,
  "complexity": 0.0-1.0,
  "explanation": "1-2 sentence explanation of the priority assessment"
}}

Do NOT include markdown formatting or any text outside the JSON."#,
        condition = record.condition_id,
        related = record.related_documents,
        confidence = detection_confidence,
        deficiencies = deficiency_text,
        reasoning = record.reasoning,
    )
}

#[derive(Deserialize)]
struct RawDimensions {
    severity: f64,
    impact: f64,
    urgency: f64,
    complexity: f64,
    #[serde(default)]
    explanation: String,
}

/// Parses the model's JSON, stripping a markdown code fence if present.
/// Out-of-range dimensions are clamped with a warning; a missing dimension
/// makes the whole response unparseable.
pub fn parse_priority_response(text: &str) -> Option<PriorityScore> {
    let body = strip_code_fence(text);
    let raw: RawDimensions = serde_json::from_str(body).ok()?;

    let mut clamp = |name: &str, value: f64| {
        if !(0.0..=1.0).contains(&value) {
            warn!(dimension = name, value, "priority dimension out of range, clamping");
        }
        value.clamp(0.0, 1.0)
    };

    Some(PriorityScore {
        severity: clamp("severity", raw.severity),
        impact: clamp("impact", raw.impact),
        urgency: clamp("urgency", raw.urgency),
        complexity: clamp("complexity", raw.complexity),
        explanation: raw.explanation,
        overall_priority: 0.0,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + 7..];
        return rest.find("```").map_or(rest, |end| &rest[..end]).trim();
    }
    if let Some(start) = trimmed.find("```") {
        let rest = &trimmed[start + 3..];
        return rest.find("```").map_or(rest, |end| &rest[..end]).trim();
    }
    trimmed
}
