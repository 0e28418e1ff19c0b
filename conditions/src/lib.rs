//! The condition DSL: model, evaluator, validation, and canonical hashing.
//!
//! This crate owns the one piece of the engine every other crate needs:
//! `rete-net` compiles [`Condition`] trees into alpha/beta nodes,
//! `conflict-detector` hashes them for duplicate detection, and `dep-graph`
//! walks [`Condition::referenced_fields`] to build the co-occurrence graph.

mod error;
mod eval;
mod hash;
mod model;
mod validate;

pub use error::ConditionError;
pub use eval::evaluate;
pub use hash::{hash_condition, hash_value, sha256_hex};
pub use model::{
    canonical_condition, canonical_json, AtomicCondition, Condition, Connective, GroupCondition,
    Operator,
};
pub use validate::validate;
