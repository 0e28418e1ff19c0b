use conditions::{AtomicCondition, Connective};
use serde::{Deserialize, Serialize};

/// Index into [`crate::network::ReteNetwork`]'s alpha arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlphaId(pub usize);

/// Index into the beta arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BetaId(pub usize);

/// A single-condition test, shared across every rule that references the
/// exact same `(field, op, value)` triple.
#[derive(Clone, Debug)]
pub struct AlphaNode {
    pub condition: AtomicCondition,
}

/// What a beta node computes before the (possible) negation is applied.
#[derive(Clone, Debug)]
pub enum BetaKind {
    /// Wraps a single alpha test. Every atomic condition occurrence gets
    /// its own leaf beta node even when the underlying alpha is shared.
    AlphaLeaf(AlphaId),
    /// AND/OR join over child beta nodes. An empty parent list is a
    /// pass-through (always true), matching an empty condition group.
    Join { op: Connective, parents: Vec<BetaId> },
}

/// A join or negation node. `is_negated` inverts the join/leaf result;
/// it is only ever set at build time and never mutated during evaluation
/// (evaluation state lives in a per-call memo, not on the node).
#[derive(Clone, Debug)]
pub struct BetaNode {
    pub kind: BetaKind,
    pub is_negated: bool,
}

/// One rule's entry point into the network: which beta node must hold for
/// the rule to fire, plus the data an evaluation report needs to describe
/// the match without going back to the rule store. Internal to the
/// network arena, never serialized directly — see [`RuleMatch`].
#[derive(Clone, Debug)]
pub struct TerminalNode {
    pub rule_id: i64,
    pub name: String,
    pub priority: i32,
    pub group: Option<String>,
    pub action: serde_json::Value,
    pub root: BetaId,
}

/// Compilation/evaluation counters exposed verbatim through the `/metrics`
/// surface and the rule-engine's stats endpoint.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NetworkStats {
    pub total_rules: usize,
    pub total_alpha_nodes: usize,
    pub shared_alpha_hits: usize,
    pub total_beta_nodes: usize,
    pub compile_count: u64,
}

/// One fired rule, in the priority order it was matched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleMatch {
    pub rule_id: i64,
    pub name: String,
    pub priority: i32,
    pub group: Option<String>,
    pub action: serde_json::Value,
}

/// What one `evaluate` call produced.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub matched: Vec<RuleMatch>,
}
