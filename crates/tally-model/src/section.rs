use serde::{Deserialize, Serialize};

/// Identifier for a section (opaque string, uuid-v4 generated).
pub type SectionId = String;

/// Kind of spending cap applied to a section's subtotal.
///
/// Caps are warning-only: an over-cap section is flagged, never blocked.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapKind {
    /// No cap configured.
    None,
    /// `cap_value` is the limit, in document currency.
    FixedAmount,
    /// The limit is `grand_total * cap_value / 100`.
    PercentOfTotal,
}

impl Default for CapKind {
    fn default() -> Self {
        Self::None
    }
}

/// A named grouping of top-level lines. Sections do not nest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique section identifier.
    pub id: SectionId,

    /// Display name.
    pub name: String,

    /// Collapsed in the tree view (presentation only).
    #[serde(default)]
    pub collapsed: bool,

    /// Cap kind; [`CapKind::None`] when the section has no cap.
    #[serde(default)]
    pub cap_kind: CapKind,

    /// Cap value, interpreted according to `cap_kind`.
    #[serde(default)]
    pub cap_value: f64,
}

impl Section {
    /// Create a new section with no cap.
    pub fn new(id: SectionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            collapsed: false,
            cap_kind: CapKind::None,
            cap_value: 0.0,
        }
    }

    /// Returns true if a cap is configured.
    pub fn has_cap(&self) -> bool {
        self.cap_kind != CapKind::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&CapKind::PercentOfTotal).unwrap();
        assert_eq!(json, "\"percent-of-total\"");
        let back: CapKind = serde_json::from_str("\"fixed-amount\"").unwrap();
        assert_eq!(back, CapKind::FixedAmount);
    }

    #[test]
    fn new_section_has_no_cap() {
        let section = Section::new("s1".into(), "Personnel");
        assert!(!section.has_cap());
        assert_eq!(section.cap_kind, CapKind::None);
    }
}
