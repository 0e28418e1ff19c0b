use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    DuplicateCondition,
    PriorityCollision,
}

/// A single pairwise conflict between two rules. `group`/`priority` are
/// populated for priority collisions; `description` carries a
/// human-readable explanation either way.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub rule1_id: i64,
    pub rule1_name: String,
    pub rule2_id: i64,
    pub rule2_name: String,
    pub group: Option<String>,
    pub priority: Option<i32>,
    pub description: String,
}
