use thiserror::Error;

/// Structural problems with a condition tree caught at validation time,
/// before the tree is ever handed to the evaluator or compiled into a
/// RETE network. Evaluator-internal failures (missing field, type
/// mismatch, bad regex) are deliberately *not* represented here — per
/// the evaluator's contract they collapse to `false` instead of an error.
#[derive(Debug, Error)]
pub enum ConditionError {
    #[error("atomic condition field name must not be empty")]
    EmptyField,
    #[error("NOT group must have exactly one child, found {0}")]
    NotGroupArity(usize),
}
