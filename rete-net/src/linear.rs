//! The condition index and the simple linear evaluator (spec §4.4). The
//! index narrows candidate rules to those referencing a field present in
//! the event; the linear evaluator walks each candidate's condition tree
//! directly with `conditions::evaluate` instead of compiling a network.
//! It exists to double-check the RETE path: both must agree on every
//! event, and the linear path is cheap enough to run as a fallback when a
//! network recompile is in flight.

use conditions::Condition;
use rule_model::Rule;
use std::collections::{BTreeSet, HashMap};

/// Inverted index from field name to the rules whose condition tree
/// references it, built once per rule set (mirrors `dep-graph`'s use of
/// the same `referenced_fields` walk).
pub struct ConditionIndex {
    field_to_rules: HashMap<String, Vec<i64>>,
}

impl ConditionIndex {
    pub fn build(rules: &[Rule]) -> Self {
        let mut field_to_rules: HashMap<String, Vec<i64>> = HashMap::new();
        for rule in rules {
            for field in rule.condition_dsl.referenced_fields() {
                field_to_rules.entry(field).or_default().push(rule.id);
            }
        }
        ConditionIndex { field_to_rules }
    }

    /// Rule ids whose condition tree touches at least one field present
    /// in the event, deduplicated and in ascending id order.
    pub fn candidate_rule_ids(&self, event: &serde_json::Map<String, serde_json::Value>) -> Vec<i64> {
        let mut ids: BTreeSet<i64> = BTreeSet::new();
        for key in event.keys() {
            if let Some(rule_ids) = self.field_to_rules.get(key) {
                ids.extend(rule_ids.iter().copied());
            }
        }
        ids.into_iter().collect()
    }
}

/// Evaluate every enabled rule's condition tree directly, without a
/// compiled network. Priority-sorted descending, matching the RETE path's
/// terminal ordering, so the two are directly comparable in tests.
pub fn evaluate_simple(rules: &[Rule], event: &serde_json::Map<String, serde_json::Value>) -> Vec<i64> {
    let mut matched: Vec<&Rule> = rules
        .iter()
        .filter(|r| r.enabled)
        .filter(|r| matches_condition(&r.condition_dsl, event))
        .collect();
    matched.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
    matched.into_iter().map(|r| r.id).collect()
}

fn matches_condition(condition: &Condition, event: &serde_json::Map<String, serde_json::Value>) -> bool {
    conditions::evaluate(condition, event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use conditions::Operator;
    use serde_json::json;

    fn rule(id: i64, field: &str, value: i64, priority: i32) -> Rule {
        Rule {
            id,
            name: format!("rule-{id}"),
            description: None,
            group: None,
            priority,
            enabled: true,
            condition_dsl: Condition::atomic(field, Operator::Gt, json!(value)),
            action: json!({}),
            rule_metadata: json!({}),
            current_version: 1,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn candidate_rules_restricted_to_event_fields() {
        let rules = vec![rule(1, "amount", 10, 1), rule(2, "risk_score", 50, 1)];
        let index = ConditionIndex::build(&rules);
        let event = json!({"amount": 100});
        let candidates = index.candidate_rule_ids(event.as_object().unwrap());
        assert_eq!(candidates, vec![1]);
    }

    #[test]
    fn simple_evaluator_matches_rete_ordering() {
        let rules = vec![rule(1, "amount", 10, 1), rule(2, "amount", 10, 99)];
        let event = json!({"amount": 50});
        let matched = evaluate_simple(&rules, event.as_object().unwrap());
        assert_eq!(matched, vec![2, 1]);
    }

    #[test]
    fn disabled_rules_never_match() {
        let mut rules = vec![rule(1, "amount", 10, 1)];
        rules[0].enabled = false;
        let event = json!({"amount": 50});
        assert!(evaluate_simple(&rules, event.as_object().unwrap()).is_empty());
    }
}
