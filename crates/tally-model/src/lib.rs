#![forbid(unsafe_code)]

//! `tally-model` defines the core in-memory budget data structures.
//!
//! The crate is intentionally self-contained so it can be reused by:
//! - the calculation engine (tree index, recalculation, aggregation)
//! - the SQLite persistence layer
//! - IPC boundaries via `serde` (JSON-safe schema)
//!
//! Hierarchy is represented as a flat [`Line`] list plus `parent_id` string
//! references, never as nested owning structures; consumers resolve the tree
//! at traversal time and must tolerate dangling references (see the engine's
//! orphan-protection policy).

mod document;
mod line;
mod lookup;
mod metadata;
mod section;

pub use document::{BudgetDocument, DocumentId, RenameSectionError};
pub use line::{Line, LineId};
pub use lookup::CostRecord;
pub use metadata::ProjectMetadata;
pub use section::{CapKind, Section, SectionId};

/// Current serialization schema version.
///
/// This is embedded into [`BudgetDocument`] to enable forward-compatible
/// persistence payloads.
pub const SCHEMA_VERSION: u32 = 1;

/// Generate a fresh opaque id for a [`Line`].
pub fn new_line_id() -> LineId {
    uuid::Uuid::new_v4().to_string()
}

/// Generate a fresh opaque id for a [`Section`].
pub fn new_section_id() -> SectionId {
    uuid::Uuid::new_v4().to_string()
}
