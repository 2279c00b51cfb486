//! Aggregate figures derived from a recalculated line list.
//!
//! The grand total sums *top-level* lines only — children's totals are
//! already folded into their parents, so summing every line would double
//! count. Cap evaluation is warning-only metadata for the presentation
//! layer; it never blocks an edit.

use serde::Serialize;

use tally_model::{CapKind, Line, ProjectMetadata, Section, SectionId};

use crate::index::TreeIndex;

/// Aggregates for one section.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionSummary {
    pub section_id: SectionId,
    pub name: String,
    /// Sum of `total` over the section's top-level lines.
    pub subtotal: f64,
    /// Fraction of the grand total (0 when the grand total is 0).
    pub share: f64,
    /// Spending limit derived from the section's cap, if one is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_limit: Option<f64>,
    /// True when the subtotal exceeds the cap limit.
    pub over_cap: bool,
}

/// Aggregates for a whole document.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DocumentSummary {
    /// Base currency label, passed through for display.
    pub currency: String,
    pub grand_total: f64,
    pub sections: Vec<SectionSummary>,
}

/// Fold a recalculated line list into per-section subtotals, cap warnings
/// and the grand total. Section order follows the input section list.
pub fn summarize(
    lines: &[Line],
    sections: &[Section],
    metadata: &ProjectMetadata,
) -> DocumentSummary {
    let index = TreeIndex::build(lines);

    // Top-level per the orphan policy, not per the stored field: a line with
    // a dangling parent reference counts toward its section's subtotal.
    let top_level: Vec<&Line> = index
        .roots()
        .iter()
        .filter_map(|id| index.get(id))
        .collect();

    let grand_total: f64 = top_level.iter().map(|l| l.total).sum();

    let sections = sections
        .iter()
        .map(|section| {
            let subtotal: f64 = top_level
                .iter()
                .filter(|l| l.section_id == section.id)
                .map(|l| l.total)
                .sum();
            let share = if grand_total == 0.0 {
                0.0
            } else {
                subtotal / grand_total
            };
            let cap_limit = match section.cap_kind {
                CapKind::None => None,
                CapKind::FixedAmount => Some(section.cap_value),
                CapKind::PercentOfTotal => Some(grand_total * section.cap_value / 100.0),
            };
            let over_cap = cap_limit.map(|limit| subtotal > limit).unwrap_or(false);
            SectionSummary {
                section_id: section.id.clone(),
                name: section.name.clone(),
                subtotal,
                share,
                cap_limit,
                over_cap,
            }
        })
        .collect();

    DocumentSummary {
        currency: metadata.base_currency.clone(),
        grand_total,
        sections,
    }
}

/// Render a share fraction as a percentage with one decimal place.
pub fn format_percent(share: f64) -> String {
    format!("{:.1}%", share * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_percent_one_decimal() {
        assert_eq!(format_percent(0.6), "60.0%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(0.12345), "12.3%");
    }
}
