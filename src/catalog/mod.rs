//! In-memory catalog of underwriting conditions.
//!
//! Rows come from the caller (the upstream system materializes them from its
//! condition spreadsheet); this module only holds them and answers the
//! classification/field filter used to pick which conditions to evaluate
//! against a document.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One underwriting condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConditionRow {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Comma-separated document types this condition applies to, or an
    /// "All Docs" marker for universal conditions.
    #[serde(default)]
    pub related_documents: String,
    /// Comma-separated field names whose presence makes the condition
    /// checkable against an extracted document.
    #[serde(default)]
    pub suggested_data_elements: String,
}

static ALL_DOCS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)all\s+doc").expect("valid literal regex"));

#[derive(Debug, Clone, Default)]
pub struct ConditionCatalog {
    rows: Vec<ConditionRow>,
}

impl ConditionCatalog {
    pub fn new(rows: Vec<ConditionRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn lookup(&self, title: &str) -> Option<&ConditionRow> {
        self.rows.iter().find(|r| r.title == title)
    }

    /// Selects conditions applicable to a classified document.
    ///
    /// A condition qualifies when its related documents mention the
    /// classification and, if `document_fields` is non-empty, at least one
    /// field appears in its suggested data elements. When that intersection
    /// comes up empty, universal "All Docs" conditions are returned instead.
    /// With no fields supplied, classification matches alone qualify.
    pub fn filter_by_classification(
        &self,
        classification: &str,
        document_fields: &[String],
        loan_program: Option<&str>,
    ) -> Vec<&ConditionRow> {
        let classification_lower = classification.to_lowercase();
        let classification_matches: Vec<&ConditionRow> = self
            .rows
            .iter()
            .filter(|r| r.related_documents.to_lowercase().contains(&classification_lower))
            .collect();

        if document_fields.is_empty() {
            debug!(
                count = classification_matches.len(),
                "classification-only condition filter"
            );
            return classification_matches;
        }

        let fields_lower: Vec<String> =
            document_fields.iter().map(|f| f.to_lowercase()).collect();
        let matching: Vec<&ConditionRow> = classification_matches
            .into_iter()
            .filter(|r| {
                let elements = r.suggested_data_elements.to_lowercase();
                fields_lower.iter().any(|f| elements.contains(f.as_str()))
            })
            .collect();

        if !matching.is_empty() {
            info!(
                count = matching.len(),
                program = loan_program.unwrap_or("-"),
                "conditions matched classification and fields"
            );
            return matching;
        }

        let fallback: Vec<&ConditionRow> = self
            .rows
            .iter()
            .filter(|r| ALL_DOCS.is_match(&r.related_documents))
            .collect();
        info!(count = fallback.len(), "falling back to universal conditions");
        fallback
    }
}

#[cfg(test)]
mod tests;
