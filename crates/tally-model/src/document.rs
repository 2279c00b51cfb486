use core::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};

use crate::{Line, ProjectMetadata, Section, SectionId};

/// Identifier for a budget document.
pub type DocumentId = uuid::Uuid;

fn default_schema_version() -> u32 {
    crate::SCHEMA_VERSION
}

/// A budget document: sections, the flat line list, and currency metadata.
///
/// The flat `lines` array is the single source of truth for the hierarchy;
/// the serialized shape of this struct is the persistence boundary contract
/// and must round-trip byte-for-byte through save/load.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BudgetDocument {
    /// Serialization schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Document identifier.
    pub id: DocumentId,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Sections, in display order.
    #[serde(default)]
    pub sections: Vec<Section>,

    /// All lines of the document, in display order within their sections.
    #[serde(default)]
    pub lines: Vec<Line>,

    /// Currency and labeling configuration.
    #[serde(default)]
    pub metadata: ProjectMetadata,
}

/// Errors raised when renaming a section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenameSectionError {
    SectionNotFound,
    EmptyName,
}

impl fmt::Display for RenameSectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenameSectionError::SectionNotFound => f.write_str("section not found"),
            RenameSectionError::EmptyName => f.write_str("section name cannot be empty"),
        }
    }
}

impl std::error::Error for RenameSectionError {}

impl BudgetDocument {
    /// Create a new empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema_version: crate::SCHEMA_VERSION,
            id: uuid::Uuid::new_v4(),
            name: name.into(),
            sections: Vec::new(),
            lines: Vec::new(),
            metadata: ProjectMetadata::default(),
        }
    }

    /// Add a section, returning its id.
    pub fn add_section(&mut self, name: impl Into<String>) -> SectionId {
        let id = crate::new_section_id();
        self.sections.push(Section::new(id.clone(), name));
        id
    }

    /// Get a section by id.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Get a mutable section by id.
    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// Find a section by name (case-insensitive).
    pub fn section_by_name(&self, name: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Rename a section.
    pub fn rename_section(&mut self, id: &str, new_name: &str) -> Result<(), RenameSectionError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(RenameSectionError::EmptyName);
        }
        let section = self
            .section_mut(id)
            .ok_or(RenameSectionError::SectionNotFound)?;
        section.name = new_name.to_string();
        Ok(())
    }

    /// Remove a section and every line assigned to it.
    ///
    /// Returns `false` if no section with the given id exists. Lines are
    /// removed by section assignment, so nested lines go with their section
    /// regardless of parent links.
    pub fn remove_section(&mut self, id: &str) -> bool {
        let Some(idx) = self.sections.iter().position(|s| s.id == id) else {
            return false;
        };
        self.sections.remove(idx);
        self.lines.retain(|line| line.section_id != id);
        true
    }

    /// Lines assigned to a section, in flat-list order.
    pub fn section_lines(&self, id: &str) -> Vec<&Line> {
        self.lines.iter().filter(|l| l.section_id == id).collect()
    }
}

impl<'de> Deserialize<'de> for BudgetDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Helper {
            #[serde(default = "default_schema_version")]
            schema_version: u32,
            id: DocumentId,
            #[serde(default)]
            name: String,
            #[serde(default)]
            sections: Vec<Section>,
            #[serde(default)]
            lines: Vec<Line>,
            #[serde(default)]
            metadata: ProjectMetadata,
        }

        let helper = Helper::deserialize(deserializer)?;

        if helper.schema_version > crate::SCHEMA_VERSION {
            return Err(D::Error::custom(format!(
                "unsupported schema_version {} (max supported: {})",
                helper.schema_version,
                crate::SCHEMA_VERSION
            )));
        }

        Ok(BudgetDocument {
            schema_version: helper.schema_version,
            id: helper.id,
            name: helper.name,
            sections: helper.sections,
            lines: helper.lines,
            metadata: helper.metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new_line_id;

    #[test]
    fn remove_section_cascades_to_lines() {
        let mut doc = BudgetDocument::new("Test");
        let kept = doc.add_section("Personnel");
        let removed = doc.add_section("Travel");

        let parent_id = new_line_id();
        let mut parent = Line::new(parent_id.clone(), removed.clone());
        parent.description = "Flights".into();
        let mut child = Line::new(new_line_id(), removed.clone());
        child.parent_id = Some(parent_id);
        let other = Line::new(new_line_id(), kept.clone());
        doc.lines = vec![parent, child, other];

        assert!(doc.remove_section(&removed));
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.lines.len(), 1);
        assert_eq!(doc.lines[0].section_id, kept);
    }

    #[test]
    fn rename_section_rejects_empty_name() {
        let mut doc = BudgetDocument::new("Test");
        let id = doc.add_section("Personnel");
        assert_eq!(
            doc.rename_section(&id, "  "),
            Err(RenameSectionError::EmptyName)
        );
        assert_eq!(
            doc.rename_section("nope", "Staff"),
            Err(RenameSectionError::SectionNotFound)
        );
        assert!(doc.rename_section(&id, " Staff ").is_ok());
        assert_eq!(doc.section(&id).unwrap().name, "Staff");
    }

    #[test]
    fn deserialize_rejects_newer_schema_version() {
        let doc = BudgetDocument::new("Test");
        let mut value = serde_json::to_value(&doc).unwrap();
        value["schema_version"] = serde_json::json!(crate::SCHEMA_VERSION + 1);
        let err = serde_json::from_value::<BudgetDocument>(value).unwrap_err();
        assert!(err.to_string().contains("unsupported schema_version"));
    }
}
