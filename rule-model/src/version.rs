use crate::rule::Rule;
use chrono::{DateTime, Utc};
use conditions::Condition;
use serde::{Deserialize, Serialize};

/// A flat, immutable snapshot of a rule at the moment it changed. Unlike
/// `Rule`, a version is never mutated after it is written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleVersion {
    pub id: i64,
    pub rule_id: i64,
    pub version: i32,
    pub name: String,
    pub description: Option<String>,
    pub group: Option<String>,
    pub priority: i32,
    pub enabled: bool,
    pub condition_dsl: Condition,
    pub action: serde_json::Value,
    pub rule_metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl RuleVersion {
    pub fn from_rule(rule: &Rule, version: i32, snapshot_id: i64, created_at: DateTime<Utc>) -> Self {
        RuleVersion {
            id: snapshot_id,
            rule_id: rule.id,
            version,
            name: rule.name.clone(),
            description: rule.description.clone(),
            group: rule.group.clone(),
            priority: rule.priority,
            enabled: rule.enabled,
            condition_dsl: rule.condition_dsl.clone(),
            action: rule.action.clone(),
            rule_metadata: rule.rule_metadata.clone(),
            created_at,
        }
    }
}

/// One changed field between two versions of the same rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDiff {
    pub field: String,
    pub old: serde_json::Value,
    pub new: serde_json::Value,
}

/// Field-by-field diff of every tracked field, in a fixed order, grounded
/// in the original's `get_version_diff`. Only fields that actually changed
/// are returned.
pub fn diff_versions(from: &RuleVersion, to: &RuleVersion) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();
    let mut push = |field: &str, old: serde_json::Value, new: serde_json::Value| {
        if old != new {
            diffs.push(FieldDiff {
                field: field.to_string(),
                old,
                new,
            });
        }
    };

    push(
        "name",
        serde_json::json!(from.name),
        serde_json::json!(to.name),
    );
    push(
        "description",
        serde_json::json!(from.description),
        serde_json::json!(to.description),
    );
    push(
        "group",
        serde_json::json!(from.group),
        serde_json::json!(to.group),
    );
    push(
        "priority",
        serde_json::json!(from.priority),
        serde_json::json!(to.priority),
    );
    push(
        "enabled",
        serde_json::json!(from.enabled),
        serde_json::json!(to.enabled),
    );
    push(
        "condition_dsl",
        serde_json::to_value(&from.condition_dsl).unwrap_or_default(),
        serde_json::to_value(&to.condition_dsl).unwrap_or_default(),
    );
    push("action", from.action.clone(), to.action.clone());
    push(
        "rule_metadata",
        from.rule_metadata.clone(),
        to.rule_metadata.clone(),
    );

    diffs
}

#[cfg(test)]
mod tests {
    use super::*;
    use conditions::Operator;

    fn version(priority: i32, name: &str) -> RuleVersion {
        RuleVersion {
            id: 1,
            rule_id: 1,
            version: 1,
            name: name.into(),
            description: None,
            group: None,
            priority,
            enabled: true,
            condition_dsl: Condition::atomic("amount", Operator::Gt, serde_json::json!(100)),
            action: serde_json::json!({}),
            rule_metadata: serde_json::json!({}),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn diff_reports_only_changed_fields() {
        let v1 = version(10, "alert");
        let mut v2 = version(20, "alert");
        v2.version = 2;

        let diffs = diff_versions(&v1, &v2);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].field, "priority");
    }

    #[test]
    fn identical_versions_diff_to_nothing() {
        let v1 = version(10, "alert");
        let v2 = version(10, "alert");
        assert!(diff_versions(&v1, &v2).is_empty());
    }
}
