//! The condition DSL: atomic predicates and nested AND/OR/NOT groups.
//!
//! Shape mirrors the wire format exactly so `serde_json` round-trips it
//! without a separate parser:
//!
//! ```json
//! {"type":"condition","field":"amount","op":">","value":1000}
//! {"type":"group","op":"AND","children":[...]}
//! ```

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// The closed set of comparison/membership/existence operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "not_in")]
    NotIn,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "starts_with")]
    StartsWith,
    #[serde(rename = "ends_with")]
    EndsWith,
    #[serde(rename = "regex")]
    Regex,
    #[serde(rename = "exists")]
    Exists,
    #[serde(rename = "not_exists")]
    NotExists,
}

/// Logical connective for a group node. `Not` applies only to its first child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connective {
    And,
    Or,
    Not,
}

/// A single `(field, op, value)` triple. Value-equal and hashable so that
/// two rules referencing the same triple can share one alpha node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AtomicCondition {
    pub field: String,
    pub op: Operator,
    #[serde(default = "serde_json::Value::default")]
    pub value: serde_json::Value,
}

impl PartialEq for AtomicCondition {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.op == other.op && self.value == other.value
    }
}

impl Eq for AtomicCondition {}

impl Hash for AtomicCondition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field.hash(state);
        self.op.hash(state);
        // serde_json::Value has no Hash impl; hash its canonical text form
        // instead (object keys are already sorted, see `canonical_json`).
        canonical_json(&self.value).hash(state);
    }
}

/// An AND/OR/NOT group over an ordered sequence of children. Empty is true.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupCondition {
    pub op: Connective,
    #[serde(default)]
    pub children: Vec<Condition>,
}

/// Either an atomic predicate or a nested group, discriminated by `"type"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Condition {
    Condition(AtomicCondition),
    Group(GroupCondition),
}

impl Condition {
    pub fn atomic(field: impl Into<String>, op: Operator, value: serde_json::Value) -> Self {
        Condition::Condition(AtomicCondition {
            field: field.into(),
            op,
            value,
        })
    }

    pub fn group(op: Connective, children: Vec<Condition>) -> Self {
        Condition::Group(GroupCondition { op, children })
    }

    /// Recursively collect the set of fields referenced by atomic conditions.
    pub fn referenced_fields(&self) -> std::collections::BTreeSet<String> {
        let mut out = std::collections::BTreeSet::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields(&self, out: &mut std::collections::BTreeSet<String>) {
        match self {
            Condition::Condition(atomic) => {
                out.insert(atomic.field.clone());
            }
            Condition::Group(group) => {
                for child in &group.children {
                    child.collect_fields(out);
                }
            }
        }
    }
}

/// Serialize a JSON value with map keys in sorted order (the default
/// `serde_json::Map` backing is a `BTreeMap`, so plain `to_string` already
/// gives us this as long as the `preserve_order` feature is not enabled).
pub fn canonical_json(value: &serde_json::Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Canonical text form of an entire condition tree, used for duplicate
/// detection and as an ingredient of the rule-set network hash.
pub fn canonical_condition(condition: &Condition) -> String {
    serde_json::to_string(condition).unwrap_or_default()
}
