use std::collections::HashMap;

use tally_model::{BudgetDocument, Line};

use crate::index::TreeIndex;

/// Coerce a stored numeric field to a finite, non-negative number.
///
/// NaN, infinities and negative values all collapse to 0 — budget entry must
/// never crash or block on a stray keystroke, so malformed input silently
/// contributes nothing.
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Recompute every derived field of the flat line list.
///
/// Pure function: the input is never mutated; the returned list preserves
/// line order and all non-numeric fields. For each line, bottom-up:
/// - `quantity` and `frequency` are sanitized;
/// - leaves keep their (sanitized) `unit_cost`;
/// - parents get `unit_cost` overwritten with the sum of their children's
///   freshly computed totals;
/// - `total = quantity * frequency * unit_cost`.
///
/// Sibling traversal order is flat-list order, dangling/cyclic parent
/// references are resolved by [`TreeIndex`]'s orphan policy, and the walk
/// uses an explicit stack so arbitrarily deep chains cannot overflow the
/// call stack. Running the function on its own output is a no-op.
pub fn recalculate(lines: &[Line]) -> Vec<Line> {
    let index = TreeIndex::build(lines);
    let mut out: Vec<Line> = lines.to_vec();

    // First occurrence wins, matching the index's duplicate-id policy.
    let mut pos: HashMap<&str, usize> = HashMap::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        pos.entry(line.id.as_str()).or_insert(i);
    }

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
                let children = index.children(id);
                let child_sum: f64 = children
                    .iter()
                    .filter_map(|child| pos.get(*child))
                    .map(|&i| out[i].total)
                    .sum();

                let Some(&i) = pos.get(id) else { continue };
                let line = &mut out[i];
                line.quantity = sanitize(line.quantity);
                line.frequency = sanitize(line.frequency);
                line.unit_cost = if children.is_empty() {
                    sanitize(line.unit_cost)
                } else {
                    child_sum
                };
                line.total = line.quantity * line.frequency * line.unit_cost;
            }
        }
    }

    out
}

/// Recalculate a whole document, returning a copy with derived line fields
/// rewritten. Sections and metadata pass through untouched.
pub fn recalculate_document(doc: &BudgetDocument) -> BudgetDocument {
    let mut out = doc.clone();
    out.lines = recalculate(&doc.lines);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_rejects_non_finite_and_negative() {
        assert_eq!(sanitize(f64::NAN), 0.0);
        assert_eq!(sanitize(f64::INFINITY), 0.0);
        assert_eq!(sanitize(f64::NEG_INFINITY), 0.0);
        assert_eq!(sanitize(-3.0), 0.0);
        assert_eq!(sanitize(0.0), 0.0);
        assert_eq!(sanitize(2.5), 2.5);
    }
}
