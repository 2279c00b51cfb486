use std::collections::HashMap;

use tally_model::Line;

/// Adjacency view over a flat line list.
///
/// Built once per pass and shared by every consumer (recalculation,
/// visibility, deletion) so the orphan policy is applied in exactly one
/// place: a line whose `parent_id` is missing, dangling, self-referential or
/// part of a parent cycle is treated as a root.
///
/// Child lists and the root list preserve flat-list (insertion) order, which
/// keeps traversal output stable. All lookups are id-keyed; no numeric result
/// ever depends on hash-map iteration order.
#[derive(Debug)]
pub struct TreeIndex<'a> {
    by_id: HashMap<&'a str, &'a Line>,
    children: HashMap<&'a str, Vec<&'a str>>,
    parent: HashMap<&'a str, &'a str>,
    roots: Vec<&'a str>,
}

impl<'a> TreeIndex<'a> {
    /// Build the index. O(n) maps plus bounded parent-chain walks for cycle
    /// detection.
    pub fn build(lines: &'a [Line]) -> Self {
        let mut by_id: HashMap<&str, &Line> = HashMap::with_capacity(lines.len());
        for line in lines {
            // First occurrence wins on duplicate ids; later duplicates become
            // unreachable for calculation, matching the id→line lookup below.
            by_id.entry(line.id.as_str()).or_insert(line);
        }

        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut parent: HashMap<&str, &str> = HashMap::new();
        let mut roots: Vec<&str> = Vec::new();

        for line in lines {
            let id = line.id.as_str();
            if by_id.get(id).map(|l| !std::ptr::eq(*l, line)).unwrap_or(true) {
                // Shadowed duplicate; skip so each id is placed exactly once.
                continue;
            }
            match effective_parent(line, &by_id) {
                Some(pid) => {
                    parent.insert(id, pid);
                    children.entry(pid).or_default().push(id);
                }
                None => roots.push(id),
            }
        }

        Self {
            by_id,
            children,
            parent,
            roots,
        }
    }

    /// Look up a line by id.
    pub fn get(&self, id: &str) -> Option<&'a Line> {
        self.by_id.get(id).copied()
    }

    /// Ordered child ids of a line (empty slice for leaves and unknown ids).
    pub fn children(&self, id: &str) -> &[&'a str] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Effective parent id, with orphan protection already applied.
    pub fn parent(&self, id: &str) -> Option<&'a str> {
        self.parent.get(id).copied()
    }

    /// Ordered root ids (lines with no effective parent).
    pub fn roots(&self) -> &[&'a str] {
        &self.roots
    }

    /// Returns true if the line has at least one child.
    pub fn has_children(&self, id: &str) -> bool {
        !self.children(id).is_empty()
    }

    /// Nesting depth of a line: 0 for roots, 1 for their children, and so on.
    ///
    /// Unknown ids report depth 0.
    pub fn depth(&self, id: &str) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(pid) = self.parent(current) {
            depth += 1;
            current = pid;
        }
        depth
    }

    /// Height of the subtree rooted at `id`: 1 for a leaf, 2 for a line with
    /// leaf children, and so on. Unknown ids report 0.
    pub fn subtree_height(&self, id: &str) -> usize {
        if self.get(id).is_none() {
            return 0;
        }
        1 + self
            .children(id)
            .iter()
            .map(|child| self.subtree_height(child))
            .max()
            .unwrap_or(0)
    }

    /// Returns true if `id` lies in the subtree rooted at `ancestor`
    /// (inclusive: a line is its own descendant).
    pub fn is_descendant(&self, id: &str, ancestor: &str) -> bool {
        if id == ancestor {
            return true;
        }
        let mut current = id;
        while let Some(pid) = self.parent(current) {
            if pid == ancestor {
                return true;
            }
            current = pid;
        }
        false
    }

    /// Ids of the subtree rooted at `id`, in flat-list order relative to the
    /// original `lines` slice passed to [`TreeIndex::build`].
    ///
    /// Returns an empty vec for unknown ids.
    pub fn subtree_ids(&self, lines: &[Line], id: &str) -> Vec<String> {
        if self.get(id).is_none() {
            return Vec::new();
        }
        lines
            .iter()
            .filter(|line| self.is_descendant(&line.id, id))
            .map(|line| line.id.clone())
            .collect()
    }
}

/// Resolve a line's parent reference, applying orphan protection.
///
/// The reference is honored only when it points at a *different* existing
/// line and following the chain upward never returns to the starting line
/// (cycle tolerance). The walk is bounded by the number of lines.
fn effective_parent<'a>(line: &'a Line, by_id: &HashMap<&'a str, &'a Line>) -> Option<&'a str> {
    let pid = line.parent_id.as_deref()?;
    if pid == line.id {
        return None;
    }
    let first = *by_id.get(pid)?;

    let mut current = first;
    let mut steps = 0usize;
    loop {
        if current.id == line.id {
            // Parent chain loops back through this line; break the cycle here.
            return None;
        }
        steps += 1;
        if steps > by_id.len() {
            // Cycle entirely above this line; its own link is still usable
            // because the looping ancestors demote themselves to roots.
            return Some(first.id.as_str());
        }
        let Some(next) = current
            .parent_id
            .as_deref()
            .filter(|next| *next != current.id)
            .and_then(|next| by_id.get(next).copied())
        else {
            return Some(first.id.as_str());
        };
        current = next;
    }
}
