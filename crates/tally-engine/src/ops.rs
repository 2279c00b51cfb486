//! Mutation operations over the flat line list.
//!
//! Every operation is pure: it takes the current list and returns a new one,
//! leaving the input untouched so concurrent readers never observe a
//! half-updated tree. Callers must pass the result through
//! [`crate::recalculate`] before treating it as authoritative — after *every*
//! field edit, not just structural changes, because editing a leaf's cost
//! must propagate to all its ancestors.

use thiserror::Error;

use tally_model::{new_line_id, CostRecord, Line, LineId};

use crate::index::TreeIndex;
use crate::input::parse_numeric_input;
use crate::recalc::sanitize;
use crate::MAX_NESTING_DEPTH;

/// Why a mutation was rejected. The input list is returned unchanged in
/// every error case.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("line not found: {0}")]
    LineNotFound(LineId),
    #[error("unit cost is derived from children and cannot be edited")]
    UnitCostLocked,
    #[error("nesting deeper than {MAX_NESTING_DEPTH} levels is not allowed")]
    DepthLimit,
    #[error("a line cannot become a descendant of itself")]
    WouldCycle,
    #[error("line is already top-level")]
    NotNested,
}

/// A single-field edit applied by [`edit_line`].
#[derive(Clone, Debug, PartialEq)]
pub enum LineEdit {
    Description(String),
    Category(String),
    Note(Option<String>),
    Unit(String),
    Quantity(f64),
    Frequency(f64),
    UnitCost(f64),
    Selected(bool),
}

/// Field targeted by [`paste_column`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasteTarget {
    Description,
    Category,
    Unit,
    Quantity,
    Frequency,
    UnitCost,
}

/// Append a new line with defaults (quantity 1, frequency 1, unit cost 0).
///
/// With a parent id, the new line nests under that parent and inherits its
/// section; nesting past [`MAX_NESTING_DEPTH`] levels is rejected. Returns
/// the new list and the fresh line id.
pub fn add_line(
    lines: &[Line],
    section_id: &str,
    parent_id: Option<&str>,
) -> Result<(Vec<Line>, LineId), EditError> {
    let id = new_line_id();
    let mut line = Line::new(id.clone(), section_id.to_string());

    if let Some(pid) = parent_id {
        let index = TreeIndex::build(lines);
        let parent = index
            .get(pid)
            .ok_or_else(|| EditError::LineNotFound(pid.to_string()))?;
        if index.depth(pid) + 1 >= MAX_NESTING_DEPTH {
            return Err(EditError::DepthLimit);
        }
        line.section_id = parent.section_id.clone();
        line.parent_id = Some(pid.to_string());
    }

    let mut out = lines.to_vec();
    out.push(line);
    Ok((out, id))
}

/// Replace one field on one line.
///
/// Numeric edits pass through the same sanitizer as recalculation. A
/// `UnitCost` edit on a line that currently has children is rejected: the
/// value is derived there and the next recalculation would overwrite it
/// anyway, so the rejection keeps the UI honest instead of silently
/// dropping the keystroke.
pub fn edit_line(lines: &[Line], id: &str, edit: LineEdit) -> Result<Vec<Line>, EditError> {
    let index = TreeIndex::build(lines);
    if index.get(id).is_none() {
        return Err(EditError::LineNotFound(id.to_string()));
    }
    if matches!(edit, LineEdit::UnitCost(_)) && index.has_children(id) {
        return Err(EditError::UnitCostLocked);
    }

    let mut out = lines.to_vec();
    for line in out.iter_mut().filter(|l| l.id == id) {
        match &edit {
            LineEdit::Description(v) => line.description = v.clone(),
            LineEdit::Category(v) => line.category = v.clone(),
            LineEdit::Note(v) => line.note = v.clone(),
            LineEdit::Unit(v) => line.unit = v.clone(),
            LineEdit::Quantity(v) => line.quantity = sanitize(*v),
            LineEdit::Frequency(v) => line.frequency = sanitize(*v),
            LineEdit::UnitCost(v) => line.unit_cost = sanitize(*v),
            LineEdit::Selected(v) => line.selected = *v,
        }
    }
    Ok(out)
}

/// Copy a looked-up cost record's fields onto a line as ordinary edits.
pub fn apply_cost_record(
    lines: &[Line],
    id: &str,
    record: &CostRecord,
) -> Result<Vec<Line>, EditError> {
    let out = edit_line(lines, id, LineEdit::Description(record.description.clone()))?;
    let out = edit_line(&out, id, LineEdit::Category(record.category.clone()))?;
    let out = edit_line(&out, id, LineEdit::Unit(record.unit.clone()))?;
    match edit_line(&out, id, LineEdit::UnitCost(record.unit_cost)) {
        Ok(out) => Ok(out),
        // Applying onto a parent keeps its derived unit cost.
        Err(EditError::UnitCostLocked) => Ok(out),
        Err(err) => Err(err),
    }
}

/// Remove a line and its entire subtree. Unknown ids are a no-op.
pub fn delete_line(lines: &[Line], id: &str) -> Vec<Line> {
    let index = TreeIndex::build(lines);
    lines
        .iter()
        .filter(|line| !index.is_descendant(&line.id, id))
        .cloned()
        .collect()
}

/// Remove every selected line together with its subtree.
pub fn delete_selected(lines: &[Line]) -> Vec<Line> {
    let index = TreeIndex::build(lines);
    let selected: Vec<&str> = lines
        .iter()
        .filter(|l| l.selected)
        .map(|l| l.id.as_str())
        .collect();
    lines
        .iter()
        .filter(|line| !selected.iter().any(|sel| index.is_descendant(&line.id, sel)))
        .cloned()
        .collect()
}

/// Set the selection flag on one line. Unknown ids are a no-op.
pub fn set_selected(lines: &[Line], id: &str, selected: bool) -> Vec<Line> {
    let mut out = lines.to_vec();
    for line in out.iter_mut().filter(|l| l.id == id) {
        line.selected = selected;
    }
    out
}

/// Clone a line and its subtree with fresh ids.
///
/// Internal parent references are remapped to the new ids; the clone root
/// keeps the original's parent. Clones are inserted immediately after the
/// last original node of the subtree, preserving relative order, so the
/// copy renders directly beneath its source. Returns the new list and the
/// clone root's id.
pub fn duplicate_line(lines: &[Line], id: &str) -> Result<(Vec<Line>, LineId), EditError> {
    let index = TreeIndex::build(lines);
    if index.get(id).is_none() {
        return Err(EditError::LineNotFound(id.to_string()));
    }
    let subtree = index.subtree_ids(lines, id);

    let mut id_map: std::collections::HashMap<&str, LineId> = std::collections::HashMap::new();
    for old in &subtree {
        id_map.insert(old.as_str(), new_line_id());
    }

    let mut clones: Vec<Line> = Vec::with_capacity(subtree.len());
    let mut insert_at = 0;
    for (i, line) in lines.iter().enumerate() {
        let Some(new_id) = id_map.get(line.id.as_str()) else {
            continue;
        };
        insert_at = i + 1;
        let mut clone = line.clone();
        clone.id = new_id.clone();
        if line.id != id {
            clone.parent_id = line
                .parent_id
                .as_deref()
                .and_then(|pid| id_map.get(pid).cloned());
        }
        clones.push(clone);
    }

    let root_id = id_map[id].clone();
    let mut out = lines.to_vec();
    out.splice(insert_at..insert_at, clones);
    Ok((out, root_id))
}

/// Move a line (and its subtree) to another section as a top-level line.
///
/// The dragged line's parent link is cleared; descendants keep their parent
/// links and only follow along with the section assignment.
pub fn move_line_to_section(
    lines: &[Line],
    id: &str,
    target_section: &str,
) -> Result<Vec<Line>, EditError> {
    let index = TreeIndex::build(lines);
    if index.get(id).is_none() {
        return Err(EditError::LineNotFound(id.to_string()));
    }

    let mut out = lines.to_vec();
    for line in out.iter_mut() {
        if !index.is_descendant(&line.id, id) {
            continue;
        }
        line.section_id = target_section.to_string();
        if line.id == id {
            line.parent_id = None;
        }
    }
    Ok(out)
}

/// Attach a line (and its subtree) under a new parent.
///
/// Rejected when the proposed parent is the line itself or one of its
/// descendants (`WouldCycle`), or when the combined depth would exceed
/// [`MAX_NESTING_DEPTH`]. The moved subtree adopts the parent's section.
pub fn reparent_line(lines: &[Line], id: &str, new_parent: &str) -> Result<Vec<Line>, EditError> {
    let index = TreeIndex::build(lines);
    if index.get(id).is_none() {
        return Err(EditError::LineNotFound(id.to_string()));
    }
    let parent = index
        .get(new_parent)
        .ok_or_else(|| EditError::LineNotFound(new_parent.to_string()))?;
    if index.is_descendant(new_parent, id) {
        return Err(EditError::WouldCycle);
    }
    if index.depth(new_parent) + 1 + index.subtree_height(id) > MAX_NESTING_DEPTH {
        return Err(EditError::DepthLimit);
    }

    let section = parent.section_id.clone();
    let mut out = lines.to_vec();
    for line in out.iter_mut() {
        if !index.is_descendant(&line.id, id) {
            continue;
        }
        line.section_id = section.clone();
        if line.id == id {
            line.parent_id = Some(new_parent.to_string());
        }
    }
    Ok(out)
}

/// Lift a nested line one level: its parent becomes its former grandparent.
///
/// The subtree follows along untouched. Top-level lines report `NotNested`.
pub fn promote_line(lines: &[Line], id: &str) -> Result<Vec<Line>, EditError> {
    let index = TreeIndex::build(lines);
    if index.get(id).is_none() {
        return Err(EditError::LineNotFound(id.to_string()));
    }
    let Some(parent) = index.parent(id) else {
        return Err(EditError::NotNested);
    };
    let grandparent = index.parent(parent).map(str::to_string);

    let mut out = lines.to_vec();
    for line in out.iter_mut().filter(|l| l.id == id) {
        line.parent_id = grandparent.clone();
    }
    Ok(out)
}

/// Overwrite one field across consecutive lines from a pasted text block.
///
/// One text row per line in flat-list order, starting at `start_id`,
/// stopping at the end of the list. Only the first tab-delimited column of
/// each row is used. Numeric targets go through the tolerant parser;
/// unparseable rows leave the previous value unchanged, and unit-cost cells
/// of lines with children are skipped entirely.
pub fn paste_column(
    lines: &[Line],
    start_id: &str,
    target: PasteTarget,
    text: &str,
) -> Result<Vec<Line>, EditError> {
    let index = TreeIndex::build(lines);
    let start = lines
        .iter()
        .position(|l| l.id == start_id)
        .ok_or_else(|| EditError::LineNotFound(start_id.to_string()))?;

    let mut out = lines.to_vec();
    let rows = text.lines().map(|row| row.split('\t').next().unwrap_or(""));

    for (line, row) in out[start..].iter_mut().zip(rows) {
        match target {
            PasteTarget::Description => line.description = row.to_string(),
            PasteTarget::Category => line.category = row.to_string(),
            PasteTarget::Unit => line.unit = row.to_string(),
            PasteTarget::Quantity => {
                if let Some(value) = parse_numeric_input(row) {
                    line.quantity = sanitize(value);
                }
            }
            PasteTarget::Frequency => {
                if let Some(value) = parse_numeric_input(row) {
                    line.frequency = sanitize(value);
                }
            }
            PasteTarget::UnitCost => {
                if index.has_children(&line.id) {
                    continue;
                }
                if let Some(value) = parse_numeric_input(row) {
                    line.unit_cost = sanitize(value);
                }
            }
        }
    }
    Ok(out)
}

/// Convenience used by tests and hosts: did this line have children before
/// the edit? Determines whether its unit-cost input should render locked.
pub fn unit_cost_locked(lines: &[Line], id: &str) -> bool {
    TreeIndex::build(lines).has_children(id)
}
