//! End-to-end scoring runs over the scripted completion mock.

use lintel::generation::MockCompleter;
use lintel::scoring::{
    Deficiency, DeficiencyRanker, DeficiencyRecord, DeficiencyStatus, ScoringConfig,
    calculate_detection_confidence,
};

fn record(condition_id: &str, deficiencies: Vec<Deficiency>) -> DeficiencyRecord {
    DeficiencyRecord {
        condition_id: condition_id.to_string(),
        status: DeficiencyStatus::Deficient,
        deficiencies,
        reasoning: "The document lacks the required section because the array is empty."
            .to_string(),
        checked_fields: vec!["form1125E".to_string()],
        related_documents: String::new(),
        actionable_instruction: String::new(),
        documents_checked: Vec::new(),
        satisfied_by: None,
        extra: serde_json::Map::new(),
    }
}

fn deficiency() -> Deficiency {
    Deficiency {
        requirement: "Must be signed".to_string(),
        issue: "Signature missing".to_string(),
        field_checked: "form1125E[].signature".to_string(),
        evidence: "Array is empty []".to_string(),
    }
}

fn dims_json(severity: f64, impact: f64, urgency: f64, complexity: f64) -> String {
    format!(
        r#"{{"severity": {severity}, "impact": {impact}, "urgency": {urgency}, "complexity": {complexity}, "explanation": "scripted"}}"#
    )
}

#[test]
fn test_more_deficiencies_never_lower_confidence() {
    let config = ScoringConfig::default();
    let one = calculate_detection_confidence(&record("c", vec![deficiency()]), &config);
    let two = calculate_detection_confidence(&record("c", vec![deficiency(); 2]), &config);
    let three = calculate_detection_confidence(&record("c", vec![deficiency(); 3]), &config);

    assert!(two.breakdown.deficiency_count_score >= one.breakdown.deficiency_count_score);
    assert!(three.breakdown.deficiency_count_score >= two.breakdown.deficiency_count_score);
}

#[test]
fn test_zero_itemized_deficiencies_floor_scores() {
    let config = ScoringConfig::default();
    let mut empty = record("c", Vec::new());
    empty.checked_fields.clear();
    empty.reasoning.clear();

    let result = calculate_detection_confidence(&empty, &config);
    assert_eq!(result.breakdown.deficiency_count_score, 0.3);
    assert_eq!(result.breakdown.evidence_completeness, 0.2);
    assert_eq!(result.breakdown.field_specificity, 0.2);
}

#[tokio::test]
async fn test_lower_complexity_raises_priority() {
    // Identical dimensions except complexity: the easier fix ranks first.
    let completer = MockCompleter::new()
        .respond(dims_json(0.6, 0.6, 0.6, 0.9))
        .respond(dims_json(0.6, 0.6, 0.6, 0.1));
    let ranker = DeficiencyRanker::new(ScoringConfig::default(), completer);

    let (report, _) = ranker
        .score_all(
            vec![
                record("hard-fix", vec![deficiency()]),
                record("easy-fix", vec![deficiency()]),
            ],
            10,
        )
        .await;

    assert_eq!(report.scored_deficiencies[0].condition_id, "easy-fix");
    let easy = &report.scored_deficiencies[0];
    let hard = &report.scored_deficiencies[1];
    assert!(easy.priority_score > hard.priority_score);
}

#[tokio::test]
async fn test_universal_condition_maps_bank_statement_documents() {
    let completer = MockCompleter::new().respond(dims_json(0.5, 0.5, 0.5, 0.5));
    let ranker = DeficiencyRanker::new(ScoringConfig::default(), completer);

    let mut rec = record("bank deposits", vec![deficiency()]);
    rec.related_documents = "All Docs Pass Through".to_string();
    rec.actionable_instruction = "Upload two months of bank statements".to_string();

    let (report, _) = ranker.score_all(vec![rec], 10).await;

    assert_eq!(
        report.scored_deficiencies[0].actionable_documents,
        "Business Bank Statement, Personal Bank Statement"
    );
}

#[tokio::test]
async fn test_transport_error_produces_exact_neutral_priority() {
    let completer = MockCompleter::new().fail("timeout");
    let ranker = DeficiencyRanker::new(ScoringConfig::default(), completer);

    let (report, usage) = ranker.score_all(vec![record("c", vec![deficiency()])], 10).await;

    let scored = &report.scored_deficiencies[0];
    // With weights 0.4/0.3/0.2/0.1 and all dimensions at 0.5:
    // 0.4*0.5 + 0.3*0.5 + 0.2*0.5 + 0.1*(1 - 0.5) = 0.5 exactly.
    assert_eq!(scored.priority_score, 0.5);
    // A failed call reports no token usage.
    assert_eq!(usage.input_tokens, 0);
    assert_eq!(usage.output_tokens, 0);
}

#[tokio::test]
async fn test_markdown_fenced_response_is_parsed() {
    let fenced = format!("```json\n{}\n```", dims_json(0.9, 0.9, 0.9, 0.2));
    let completer = MockCompleter::new().respond(fenced);
    let ranker = DeficiencyRanker::new(ScoringConfig::default(), completer);

    let (report, _) = ranker.score_all(vec![record("c", vec![deficiency()])], 10).await;

    let scored = &report.scored_deficiencies[0];
    assert_eq!(scored.priority_dimensions.severity, 0.9);
    assert_eq!(scored.priority_dimensions.explanation, "scripted");
    assert!(scored.priority_score > 0.8);
}

#[tokio::test]
async fn test_report_round_trips_through_serde() {
    let completer = MockCompleter::new().respond(dims_json(0.7, 0.6, 0.5, 0.4));
    let ranker = DeficiencyRanker::new(ScoringConfig::default(), completer);

    let (report, _) = ranker.score_all(vec![record("c", vec![deficiency()])], 10).await;

    let json = serde_json::to_string(&report).unwrap();
    let parsed: lintel::scoring::ScoreReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.scored_deficiencies.len(), 1);
    assert_eq!(
        parsed.scored_deficiencies[0].priority_score,
        report.scored_deficiencies[0].priority_score
    );
}
