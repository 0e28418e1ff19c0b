use crate::error::ConditionError;
use crate::model::{Condition, Connective};

/// Structural validation performed once, when a rule is created or updated,
/// not on every evaluation. Unknown operators and unknown node shapes are
/// already rejected by `serde_json` deserialization before this runs.
pub fn validate(condition: &Condition) -> Result<(), ConditionError> {
    match condition {
        Condition::Condition(atomic) => {
            if atomic.field.trim().is_empty() {
                return Err(ConditionError::EmptyField);
            }
            Ok(())
        }
        Condition::Group(group) => {
            if group.op == Connective::Not && group.children.len() != 1 {
                return Err(ConditionError::NotGroupArity(group.children.len()));
            }
            for child in &group.children {
                validate(child)?;
            }
            Ok(())
        }
    }
}
