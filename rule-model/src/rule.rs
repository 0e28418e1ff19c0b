use chrono::{DateTime, Utc};
use conditions::Condition;
use serde::{Deserialize, Serialize};

/// Rules with no explicit group collide on priority within this bucket,
/// matching the original's implicit `group or "default"` grouping.
pub const DEFAULT_GROUP: &str = "default";

/// A stored rule: the condition tree that gates it, the action it fires,
/// and the bookkeeping spec §3's "Rule metadata fields" supplement adds
/// (`description`, `created_by`, timestamps) on top of the core fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub group: Option<String>,
    pub priority: i32,
    pub enabled: bool,
    pub condition_dsl: Condition,
    /// Opaque action payload; `action-exec` interprets the `Effect`
    /// classification, this crate only stores and round-trips it.
    pub action: serde_json::Value,
    #[serde(default)]
    pub rule_metadata: serde_json::Value,
    pub current_version: i32,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rule {
    /// The bucket used for priority-collision detection: an explicit
    /// group, or the implicit default bucket.
    pub fn group_or_default(&self) -> &str {
        self.group.as_deref().unwrap_or(DEFAULT_GROUP)
    }

    /// Apply a partial update in place. Only fields present in the draft
    /// are touched; `updated_at` and `current_version` are the caller's
    /// responsibility (they depend on transaction/versioning state that
    /// lives in `rule-store`).
    pub fn apply_draft(&mut self, draft: RuleDraft) {
        if let Some(name) = draft.name {
            self.name = name;
        }
        if let Some(description) = draft.description {
            self.description = description;
        }
        if let Some(group) = draft.group {
            self.group = group;
        }
        if let Some(priority) = draft.priority {
            self.priority = priority;
        }
        if let Some(enabled) = draft.enabled {
            self.enabled = enabled;
        }
        if let Some(condition_dsl) = draft.condition_dsl {
            self.condition_dsl = condition_dsl;
        }
        if let Some(action) = draft.action {
            self.action = action;
        }
        if let Some(rule_metadata) = draft.rule_metadata {
            self.rule_metadata = rule_metadata;
        }
    }
}

/// A fields-only request shape used by both create and update; callers
/// populate only what they mean to set. `rule-store` assigns id, version,
/// and timestamps.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RuleDraft {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub group: Option<Option<String>>,
    pub priority: Option<i32>,
    pub enabled: Option<bool>,
    pub condition_dsl: Option<Condition>,
    pub action: Option<serde_json::Value>,
    pub rule_metadata: Option<serde_json::Value>,
}
