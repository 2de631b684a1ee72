//! Actionable-document extraction.
//!
//! Narrows a condition's related-document list down to the documents the
//! actionable instruction is actually asking for. Conditions tagged with a
//! universal sentinel get their document types inferred from the instruction
//! text instead.

use std::sync::LazyLock;

use regex::Regex;

/// Markers meaning "this condition applies to every document".
const UNIVERSAL_SENTINELS: [&str; 4] =
    ["all docs pass through", "all documents", "all docs", "universal"];

/// Instruction keyword to canonical document types, for universal conditions.
const DOC_TYPE_MAPPING: [(&str, &str); 10] = [
    ("bank statement", "Business Bank Statement, Personal Bank Statement"),
    (
        "tax return",
        "1040 Personal Tax Return, 1120 Corporate Tax Return, Form 1120S Scorp, Form 1065",
    ),
    ("paystub", "Paystub, Pay Stub"),
    ("w-2", "W-2 Form, W2"),
    (
        "cpa letter",
        "CPA Letter for Self-Employment, CPA Letter for Use of Business Funds",
    ),
    ("profit and loss", "Profit and Loss Statement, P&L Statement"),
    ("balance sheet", "Balance Sheet"),
    ("credit report", "Credit Report"),
    ("appraisal", "Appraisal Report"),
    ("title", "Title Report, Preliminary Title"),
];

const UNIVERSAL_FALLBACK: &str = "See actionable instruction for required documents";

/// Document-type words worth matching even when lowercase in the instruction.
const DOC_TYPE_WORDS: [&str; 28] = [
    "tax", "return", "letter", "cpa", "k-1", "k1", "schedule", "form", "statement", "report",
    "agreement", "certificate", "paystub", "w-2", "w2", "1099", "1040", "1065", "1120",
    "articles", "operating", "partnership", "incorporation", "organization", "bank", "credit",
    "proof", "verification",
];

static PROPER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    // Capitalized words and numbered forms, e.g. "K-1", "1120S", "CPA".
    Regex::new(r"\b[A-Z0-9][A-Za-z0-9\-]*\b").expect("valid literal regex")
});

/// Filters `related_documents` down to the entries the instruction mentions.
///
/// Universal conditions map instruction keywords straight to document types;
/// everything else is keyword intersection, falling back to the full list
/// when nothing matches.
pub fn extract_actionable_documents(
    actionable_instruction: &str,
    related_documents: &str,
) -> String {
    if actionable_instruction.is_empty() || related_documents.is_empty() {
        return related_documents.to_string();
    }

    let related_lower = related_documents.trim().to_lowercase();
    if UNIVERSAL_SENTINELS.contains(&related_lower.as_str()) {
        let instruction_lower = actionable_instruction.to_lowercase();
        for (keyword, doc_types) in DOC_TYPE_MAPPING {
            if instruction_lower.contains(keyword) {
                return doc_types.to_string();
            }
        }
        return UNIVERSAL_FALLBACK.to_string();
    }

    let mut keywords: Vec<String> = PROPER_TOKEN
        .find_iter(actionable_instruction)
        .map(|m| m.as_str().to_lowercase())
        .collect();

    let instruction_lower = actionable_instruction.to_lowercase();
    for word in DOC_TYPE_WORDS {
        if instruction_lower.contains(word) {
            keywords.push(word.to_string());
        }
    }

    let relevant: Vec<&str> = related_documents
        .split(',')
        .map(str::trim)
        .filter(|doc| {
            let doc_lower = doc.to_lowercase();
            keywords.iter().any(|k| doc_lower.contains(k.as_str()))
        })
        .collect();

    if relevant.is_empty() {
        related_documents.to_string()
    } else {
        relevant.join(", ")
    }
}
