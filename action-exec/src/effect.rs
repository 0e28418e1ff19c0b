use serde::{Deserialize, Serialize};

/// How reversible an action is, reused from the teacher's `rig-effects`
/// four-level lattice so the executor boundary can make retry decisions
/// without knowing what the action actually does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// No observable side effect — safe to retry or skip freely.
    Pure,
    /// Reads external state without changing it.
    Observe,
    /// Changes external state but can be corrected by a later action.
    Mutate,
    /// Cannot be undone once it has run.
    Irreversible,
}

/// What a failed action of a given effect level should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recovery {
    Retry,
    CheckAndRetry,
    ManualReview,
}

impl Effect {
    pub fn recovery(&self) -> Recovery {
        match self {
            Effect::Pure | Effect::Observe => Recovery::Retry,
            Effect::Mutate => Recovery::CheckAndRetry,
            Effect::Irreversible => Recovery::ManualReview,
        }
    }

    pub fn backtrackable(&self) -> bool {
        !matches!(self, Effect::Irreversible)
    }

    /// Relative weight used when a caller wants to order concurrent
    /// actions from cheapest to riskiest to undo.
    pub fn cost_weight(&self) -> u8 {
        match self {
            Effect::Pure => 0,
            Effect::Observe => 1,
            Effect::Mutate => 5,
            Effect::Irreversible => 10,
        }
    }
}

/// Anything dispatched through an [`crate::ActionExecutor`] carries its
/// effect classification.
pub trait Effectful {
    fn effect(&self) -> Effect;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irreversible_actions_are_not_backtrackable() {
        assert!(!Effect::Irreversible.backtrackable());
        assert!(Effect::Mutate.backtrackable());
    }

    #[test]
    fn recovery_escalates_with_effect_severity() {
        assert_eq!(Effect::Pure.recovery(), Recovery::Retry);
        assert_eq!(Effect::Mutate.recovery(), Recovery::CheckAndRetry);
        assert_eq!(Effect::Irreversible.recovery(), Recovery::ManualReview);
    }
}
