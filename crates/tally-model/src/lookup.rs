use serde::{Deserialize, Serialize};

/// A candidate cost record returned by the cost-lookup collaborator.
///
/// Records are harvested from the leaf lines of saved documents; applying one
/// to an active line is a sequence of ordinary field edits performed by the
/// engine (`apply_cost_record`). The engine does no ranking or filtering of
/// its own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub description: String,
    pub category: String,
    pub unit: String,
    pub unit_cost: f64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default)]
    pub donor: String,
    #[serde(default)]
    pub sector: String,
}
