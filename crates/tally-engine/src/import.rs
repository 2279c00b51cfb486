//! Applying bulk-imported candidate records to a document.
//!
//! The import collaborator (spreadsheet extraction lives outside this
//! workspace) hands over a flat list of pre-parsed candidates. Each becomes
//! a new top-level line in a section named after its category — created on
//! demand, in first-appearance order — and the resulting list is passed
//! through the recalculation engine before being returned, so callers can
//! treat the output as authoritative immediately.

use serde::{Deserialize, Serialize};

use tally_model::{new_line_id, BudgetDocument, Line};

use crate::recalc::recalculate;

/// A candidate line item produced by the bulk-import collaborator.
///
/// `frequency` defaults to 1 when the source document carries no such
/// column. Percent-style frequency heuristics are the importer's business;
/// the engine treats frequency as a plain multiplier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default = "default_one")]
    pub quantity: f64,
    #[serde(default = "default_one")]
    pub frequency: f64,
    #[serde(default)]
    pub unit_cost: f64,
}

fn default_one() -> f64 {
    1.0
}

/// Append imported records to a document and recalculate.
///
/// Pure: returns a new document. Section matching is by name,
/// case-insensitive; records with a blank category land in an "Imported"
/// section.
pub fn apply_import(doc: &BudgetDocument, records: &[ImportRecord]) -> BudgetDocument {
    let mut out = doc.clone();

    for record in records {
        let category = record.category.trim();
        let section_name = if category.is_empty() {
            "Imported"
        } else {
            category
        };
        let section_id = match out.section_by_name(section_name) {
            Some(section) => section.id.clone(),
            None => out.add_section(section_name),
        };

        let mut line = Line::new(new_line_id(), section_id);
        line.description = record.description.clone();
        line.category = record.category.clone();
        line.unit = record.unit.clone();
        line.quantity = record.quantity;
        line.frequency = record.frequency;
        line.unit_cost = record.unit_cost;
        out.lines.push(line);
    }

    out.lines = recalculate(&out.lines);
    out
}
