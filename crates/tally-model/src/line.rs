use serde::{Deserialize, Serialize};

use crate::SectionId;

/// Identifier for a budget line (opaque string, uuid-v4 generated).
pub type LineId = String;

/// A single budget entry.
///
/// Lines form a tree through `parent_id` references into the same flat list.
/// `unit_cost` and `total` are derived for lines with children; the
/// recalculation pass overwrites whatever is stored there. A `parent_id` that
/// does not resolve to an existing line in the same list is ignored and the
/// line is treated as top-level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Unique line identifier.
    pub id: LineId,

    /// Section this line belongs to (reference, not ownership).
    pub section_id: SectionId,

    /// Parent line in the same section, if nested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<LineId>,

    /// Cost category label (e.g. "Personnel").
    #[serde(default)]
    pub category: String,

    /// Human-readable description of the entry.
    #[serde(default)]
    pub description: String,

    /// Optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Count of units (non-negative).
    #[serde(default = "default_one")]
    pub quantity: f64,

    /// Multiplier, e.g. months active (non-negative).
    #[serde(default = "default_one")]
    pub frequency: f64,

    /// Unit label (e.g. "month", "item").
    #[serde(default)]
    pub unit: String,

    /// Cost per unit. Derived from children totals for non-leaf lines.
    #[serde(default)]
    pub unit_cost: f64,

    /// Always derived: `quantity * frequency * unit_cost`.
    #[serde(default)]
    pub total: f64,

    /// Selection flag for bulk actions (presentation state).
    #[serde(default)]
    pub selected: bool,
}

fn default_one() -> f64 {
    1.0
}

impl Line {
    /// Create a new empty line in the given section.
    ///
    /// Quantity and frequency default to 1 so a freshly added line totals to
    /// its unit cost once one is entered.
    pub fn new(id: LineId, section_id: SectionId) -> Self {
        Self {
            id,
            section_id,
            parent_id: None,
            category: String::new(),
            description: String::new(),
            note: None,
            quantity: 1.0,
            frequency: 1.0,
            unit: String::new(),
            unit_cost: 0.0,
            total: 0.0,
            selected: false,
        }
    }

    /// Returns true if this line stores no parent reference.
    ///
    /// Note this is a statement about the stored field only; a line with a
    /// dangling `parent_id` is also *treated* as top-level by the engine.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_line_defaults() {
        let line = Line::new("l1".into(), "s1".into());
        assert_eq!(line.quantity, 1.0);
        assert_eq!(line.frequency, 1.0);
        assert_eq!(line.unit_cost, 0.0);
        assert_eq!(line.total, 0.0);
        assert!(line.is_top_level());
        assert!(!line.selected);
    }

    #[test]
    fn absent_optional_fields_deserialize_to_defaults() {
        let json = r#"{"id":"l1","section_id":"s1"}"#;
        let line: Line = serde_json::from_str(json).unwrap();
        assert_eq!(line.quantity, 1.0);
        assert_eq!(line.frequency, 1.0);
        assert_eq!(line.parent_id, None);
        assert_eq!(line.note, None);
    }
}
