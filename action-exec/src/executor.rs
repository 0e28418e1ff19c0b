use crate::descriptor::ActionDescriptor;
use crate::error::ActionError;
use serde::{Deserialize, Serialize};

/// What running an action produced, mirroring the original's
/// success/result-or-error dict shape from `engine/actions.py`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub result: Option<serde_json::Value>,
}

/// The boundary the terminal phase's matched rules are handed to. The
/// core never implements this beyond the two trivial executors below —
/// a real deployment supplies its own (webhook dispatch, queue publish,
/// whatever the action payload names).
pub trait ActionExecutor: Send + Sync {
    fn execute(
        &self,
        descriptor: &ActionDescriptor,
        event: &serde_json::Value,
    ) -> Result<ActionOutcome, ActionError>;
}

/// Does nothing, reports success. Used in tests and as a safe default.
pub struct NoopExecutor;

impl ActionExecutor for NoopExecutor {
    fn execute(
        &self,
        _descriptor: &ActionDescriptor,
        _event: &serde_json::Value,
    ) -> Result<ActionOutcome, ActionError> {
        Ok(ActionOutcome {
            success: true,
            result: None,
        })
    }
}

/// Logs the action at `info` and reports success. Used by the
/// `rule-server` binary until a real dispatcher is wired in.
pub struct LoggingExecutor;

impl ActionExecutor for LoggingExecutor {
    fn execute(
        &self,
        descriptor: &ActionDescriptor,
        event: &serde_json::Value,
    ) -> Result<ActionOutcome, ActionError> {
        tracing::info!(
            action = %descriptor.name,
            effect = ?descriptor.effect,
            %event,
            "action fired"
        );
        Ok(ActionOutcome {
            success: true,
            result: Some(descriptor.payload.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Effect;

    #[test]
    fn noop_executor_always_succeeds() {
        let descriptor = ActionDescriptor {
            name: "test".into(),
            effect: Effect::Pure,
            payload: serde_json::json!({}),
        };
        let outcome = NoopExecutor.execute(&descriptor, &serde_json::json!({})).unwrap();
        assert!(outcome.success);
    }

    #[test]
    fn logging_executor_echoes_payload_as_result() {
        let descriptor = ActionDescriptor {
            name: "test".into(),
            effect: Effect::Observe,
            payload: serde_json::json!({"x": 1}),
        };
        let outcome = LoggingExecutor
            .execute(&descriptor, &serde_json::json!({}))
            .unwrap();
        assert_eq!(outcome.result, Some(serde_json::json!({"x": 1})));
    }
}
