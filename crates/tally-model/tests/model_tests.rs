use pretty_assertions::assert_eq;
use tally_model::{BudgetDocument, CapKind, Line, ProjectMetadata, Section};

#[test]
fn document_json_round_trips_exactly() {
    let mut doc = BudgetDocument::new("Annual budget");
    let section_id = doc.add_section("Personnel");
    doc.section_mut(&section_id).unwrap().cap_kind = CapKind::FixedAmount;
    doc.section_mut(&section_id).unwrap().cap_value = 50_000.0;
    doc.metadata = ProjectMetadata {
        base_currency: "EUR".to_string(),
        usd_rate: 1.08,
        eur_rate: 1.0,
        donor: "ECHO".to_string(),
        sector: "WASH".to_string(),
        year: Some(2026),
        ..ProjectMetadata::default()
    };
    let mut line = Line::new("l1".to_string(), section_id);
    line.description = "Team lead".to_string();
    line.note = Some("shared with HQ".to_string());
    line.unit_cost = 3200.0;
    doc.lines.push(line);

    let json = serde_json::to_string(&doc).unwrap();
    let back: BudgetDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(back, doc);
    assert_eq!(serde_json::to_string(&back).unwrap(), json);
}

#[test]
fn optional_fields_are_omitted_from_json() {
    let line = Line::new("l1".to_string(), "s1".to_string());
    let json = serde_json::to_string(&line).unwrap();
    assert!(!json.contains("parent_id"));
    assert!(!json.contains("note"));

    let doc = BudgetDocument::new("x");
    let json = serde_json::to_string(&doc).unwrap();
    assert!(!json.contains("rate_date"));
    assert!(!json.contains("year"));
}

#[test]
fn minimal_document_deserializes_with_defaults() {
    let json = format!(
        r#"{{"id":"{}","name":"Imported"}}"#,
        uuid::Uuid::new_v4()
    );
    let doc: BudgetDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(doc.schema_version, tally_model::SCHEMA_VERSION);
    assert!(doc.sections.is_empty());
    assert!(doc.lines.is_empty());
    assert_eq!(doc.metadata.base_currency, "USD");
}

#[test]
fn section_cap_round_trips_through_kebab_case() {
    let mut section = Section::new("s1".to_string(), "Support");
    section.cap_kind = CapKind::PercentOfTotal;
    section.cap_value = 7.0;
    let json = serde_json::to_string(&section).unwrap();
    assert!(json.contains("\"percent-of-total\""));
    let back: Section = serde_json::from_str(&json).unwrap();
    assert_eq!(back, section);
}
