use crate::effect::{Effect, Effectful};
use serde::{Deserialize, Serialize};

/// The action half of a matched rule: a name the executor dispatches on,
/// an opaque JSON payload, and the effect classification that governs
/// retry/compensation behavior. `rule-model::Rule::action` stores this as
/// plain JSON; `rule-engine` parses it into a descriptor right before
/// handing it to an [`crate::ActionExecutor`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub name: String,
    pub effect: Effect,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Effectful for ActionDescriptor {
    fn effect(&self) -> Effect {
        self.effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let descriptor = ActionDescriptor {
            name: "flag_transaction".into(),
            effect: Effect::Mutate,
            payload: serde_json::json!({"severity": "high"}),
        };
        let json = serde_json::to_string(&descriptor).unwrap();
        let back: ActionDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(descriptor, back);
    }
}
