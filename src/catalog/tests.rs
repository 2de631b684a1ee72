use super::{ConditionCatalog, ConditionRow};

fn catalog() -> ConditionCatalog {
    ConditionCatalog::new(vec![
        ConditionRow {
            title: "Signed tax returns".to_string(),
            related_documents: "1120 Corporate Tax Return, Form 1065".to_string(),
            suggested_data_elements: "form1125E, scheduleGPartII, year".to_string(),
            ..Default::default()
        },
        ConditionRow {
            title: "Ownership verification".to_string(),
            related_documents: "1120 Corporate Tax Return".to_string(),
            suggested_data_elements: "percentageOwned".to_string(),
            ..Default::default()
        },
        ConditionRow {
            title: "Name consistency".to_string(),
            related_documents: "All Docs Pass Through".to_string(),
            suggested_data_elements: "borrowerName".to_string(),
            ..Default::default()
        },
    ])
}

#[test]
fn test_classification_and_field_intersection() {
    let catalog = catalog();
    let matches = catalog.filter_by_classification(
        "1120 corporate tax return",
        &["form1125E".to_string()],
        None,
    );
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].title, "Signed tax returns");
}

#[test]
fn test_no_fields_returns_classification_matches() {
    let catalog = catalog();
    let matches = catalog.filter_by_classification("1120 Corporate Tax Return", &[], None);
    assert_eq!(matches.len(), 2);
}

#[test]
fn test_empty_intersection_falls_back_to_all_docs() {
    let catalog = catalog();
    let matches = catalog.filter_by_classification(
        "1120 Corporate Tax Return",
        &["unrelatedField".to_string()],
        None,
    );
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].title, "Name consistency");
}

#[test]
fn test_lookup_by_exact_title() {
    let catalog = catalog();
    assert!(catalog.lookup("Ownership verification").is_some());
    assert!(catalog.lookup("ownership verification").is_none());
}
