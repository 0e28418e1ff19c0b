//! The rule lifecycle hook (spec §4.8): every create/update/delete emits an
//! event naming exactly the cache/conflict/network invalidation fan-out it
//! requires. `rule-store` emits these after its transaction commits;
//! `rule-engine` is the sole subscriber, translating them into calls against
//! `rule-cache`, `conflict-detector`, and `rete-net`.

use serde::{Deserialize, Serialize};

/// A rule moved through a lifecycle transition, naming the group(s) whose
/// cached state (and, transitively, compiled network) is now stale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RuleLifecycleEvent {
    Created { rule_id: i64, group: Option<String> },
    Updated {
        rule_id: i64,
        old_group: Option<String>,
        new_group: Option<String>,
    },
    Deleted { rule_id: i64, group: Option<String> },
}

impl RuleLifecycleEvent {
    /// Distinct groups that must be invalidated, deduplicated so an
    /// unchanged group is only invalidated once.
    pub fn affected_groups(&self) -> Vec<Option<String>> {
        match self {
            RuleLifecycleEvent::Created { group, .. } => vec![group.clone()],
            RuleLifecycleEvent::Deleted { group, .. } => vec![group.clone()],
            RuleLifecycleEvent::Updated {
                old_group,
                new_group,
                ..
            } => {
                if old_group == new_group {
                    vec![old_group.clone()]
                } else {
                    vec![old_group.clone(), new_group.clone()]
                }
            }
        }
    }

    pub fn rule_id(&self) -> i64 {
        match self {
            RuleLifecycleEvent::Created { rule_id, .. }
            | RuleLifecycleEvent::Updated { rule_id, .. }
            | RuleLifecycleEvent::Deleted { rule_id, .. } => *rule_id,
        }
    }
}
