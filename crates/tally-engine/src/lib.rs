#![forbid(unsafe_code)]
#![deny(unreachable_patterns)]

//! Recalculation engine for hierarchical budget documents.
//!
//! The engine operates on the flat [`tally_model::Line`] list: every mutation
//! produces a new list, the tree is re-indexed, and a single bottom-up pass
//! rewrites all derived values. Nothing here performs I/O and nothing here
//! panics on malformed input — unparseable numbers sanitize to zero and
//! broken parent references demote lines to roots, so a corrupt document
//! still computes deterministic totals.
//!
//! Call order after any edit:
//! 1. a mutation from [`ops`] (or [`import::apply_import`]) returns a new list
//! 2. [`recalculate`] derives `unit_cost`/`total` bottom-up
//! 3. [`summarize`] folds the recalculated list into section subtotals,
//!    cap warnings and the grand total
//! 4. [`visible_line_ids`] filters the presentation of the list
//!
//! Steps never read results of later steps, so each is a pure function of
//! the previous one's output.

pub mod filter;
pub mod import;
pub mod index;
pub mod input;
pub mod ops;
pub mod recalc;
pub mod summary;

/// Maximum nesting depth interactive callers may create (top-level line →
/// sub-line → sub-sub-line).
///
/// The recalculation walk itself is depth-agnostic; this bound is enforced
/// only by the mutation operations (`add_line`, `reparent_line`,
/// `duplicate_line` preserves existing shape).
pub const MAX_NESTING_DEPTH: usize = 3;

pub use filter::visible_line_ids;
pub use import::{apply_import, ImportRecord};
pub use index::TreeIndex;
pub use input::parse_numeric_input;
pub use ops::{
    add_line, apply_cost_record, delete_line, delete_selected, duplicate_line, edit_line,
    move_line_to_section, paste_column, promote_line, reparent_line, set_selected,
    unit_cost_locked, EditError, LineEdit, PasteTarget,
};
pub use recalc::{recalculate, recalculate_document, sanitize};
pub use summary::{format_percent, summarize, DocumentSummary, SectionSummary};
