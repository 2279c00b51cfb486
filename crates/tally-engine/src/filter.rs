//! Read-side visibility filtering.
//!
//! A line is visible under a text filter when its own description or
//! category matches, when anything in its subtree matches (so a matching
//! child surfaces its ancestor chain), or when an ancestor matches (so a
//! matching parent surfaces its children for context). Matching is
//! case-insensitive substring containment. Nothing here mutates the list.

use std::collections::{HashMap, HashSet};

use tally_model::{Line, LineId};

use crate::index::TreeIndex;

/// Ids of the lines visible under `filter`. An empty (or all-whitespace)
/// filter makes every line visible.
pub fn visible_line_ids(lines: &[Line], filter: &str) -> HashSet<LineId> {
    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return lines.iter().map(|l| l.id.clone()).collect();
    }

    let index = TreeIndex::build(lines);
    let matches: HashMap<&str, bool> = lines
        .iter()
        .map(|line| (line.id.as_str(), line_matches(line, &needle)))
        .collect();

    // subtree_match(id): this line or anything beneath it matches. Computed
    // bottom-up with an explicit stack, mirroring the recalculation walk.
    let mut subtree_match: HashMap<&str, bool> = HashMap::with_capacity(lines.len());

    enum Visit<'a> {
        Enter(&'a str),
        Exit(&'a str),
    }

    let mut stack: Vec<Visit> = index
        .roots()
        .iter()
        .rev()
        .map(|&id| Visit::Enter(id))
        .collect();
    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(id) => {
                stack.push(Visit::Exit(id));
                for &child in index.children(id).iter().rev() {
                    stack.push(Visit::Enter(child));
                }
            }
            Visit::Exit(id) => {
                let own = matches.get(id).copied().unwrap_or(false);
                let below = index
                    .children(id)
                    .iter()
                    .any(|child| subtree_match.get(*child).copied().unwrap_or(false));
                subtree_match.insert(id, own || below);
            }
        }
    }

    let mut visible = HashSet::new();
    for line in lines {
        let id = line.id.as_str();
        if subtree_match.get(id).copied().unwrap_or(false) || ancestor_matches(&index, &matches, id)
        {
            visible.insert(line.id.clone());
        }
    }
    visible
}

fn line_matches(line: &Line, needle: &str) -> bool {
    line.description.to_lowercase().contains(needle)
        || line.category.to_lowercase().contains(needle)
}

fn ancestor_matches(index: &TreeIndex<'_>, matches: &HashMap<&str, bool>, id: &str) -> bool {
    let mut current = id;
    while let Some(parent) = index.parent(current) {
        if matches.get(parent).copied().unwrap_or(false) {
            return true;
        }
        current = parent;
    }
    false
}
