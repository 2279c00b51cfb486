use pretty_assertions::assert_eq;
use tally_engine::{apply_import, ImportRecord};
use tally_model::BudgetDocument;

fn record(description: &str, category: &str, quantity: f64, unit_cost: f64) -> ImportRecord {
    ImportRecord {
        description: description.to_string(),
        category: category.to_string(),
        unit: "item".to_string(),
        quantity,
        frequency: 1.0,
        unit_cost,
    }
}

#[test]
fn creates_sections_on_demand_in_first_appearance_order() {
    let doc = BudgetDocument::new("Imported budget");
    let records = vec![
        record("Project manager", "Personnel", 1.0, 3000.0),
        record("Flights", "Travel", 2.0, 400.0),
        record("Field officer", "Personnel", 2.0, 1500.0),
    ];
    let out = apply_import(&doc, &records);

    assert_eq!(out.sections.len(), 2);
    assert_eq!(out.sections[0].name, "Personnel");
    assert_eq!(out.sections[1].name, "Travel");

    assert_eq!(out.lines.len(), 3);
    let personnel = &out.sections[0].id;
    assert_eq!(&out.lines[0].section_id, personnel);
    assert_eq!(&out.lines[2].section_id, personnel);
    assert!(out.lines.iter().all(|l| l.parent_id.is_none()));
}

#[test]
fn reuses_existing_sections_case_insensitively() {
    let mut doc = BudgetDocument::new("Budget");
    let existing = doc.add_section("Personnel");
    let out = apply_import(&doc, &[record("Driver", "personnel", 1.0, 800.0)]);
    assert_eq!(out.sections.len(), 1);
    assert_eq!(out.lines[0].section_id, existing);
}

#[test]
fn blank_category_lands_in_imported_section() {
    let doc = BudgetDocument::new("Budget");
    let out = apply_import(&doc, &[record("Misc", "  ", 1.0, 10.0)]);
    assert_eq!(out.sections.len(), 1);
    assert_eq!(out.sections[0].name, "Imported");
}

#[test]
fn imported_lines_arrive_recalculated() {
    let doc = BudgetDocument::new("Budget");
    let out = apply_import(&doc, &[record("Flights", "Travel", 2.0, 400.0)]);
    assert_eq!(out.lines[0].total, 800.0);

    // Malformed numerics from the importer sanitize instead of erroring.
    let out = apply_import(&doc, &[record("Broken", "Travel", f64::NAN, 400.0)]);
    assert_eq!(out.lines[0].quantity, 0.0);
    assert_eq!(out.lines[0].total, 0.0);
}

#[test]
fn input_document_is_untouched() {
    let doc = BudgetDocument::new("Budget");
    let before = doc.clone();
    let _ = apply_import(&doc, &[record("Flights", "Travel", 2.0, 400.0)]);
    assert_eq!(doc, before);
}
