//! The RETE network and the linear evaluator must agree on every event —
//! this is the conformance property spec §8 calls out for §4.4.

use chrono::Utc;
use conditions::{Condition, Operator};
use proptest::prelude::*;
use rete_net::{evaluate_simple, ReteNetwork};
use rule_model::Rule;
use std::collections::BTreeSet;

fn rule(id: i64, field: &str, op: Operator, value: serde_json::Value, priority: i32) -> Rule {
    Rule {
        id,
        name: format!("rule-{id}"),
        description: None,
        group: None,
        priority,
        enabled: true,
        condition_dsl: Condition::atomic(field, op, value),
        action: serde_json::json!({}),
        rule_metadata: serde_json::json!({}),
        current_version: 1,
        created_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn arb_rule_set() -> impl Strategy<Value = Vec<Rule>> {
    prop::collection::vec(
        (1i64..50, 0i64..200, -10i32..10),
        1..12,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(idx, (threshold, _, priority))| {
                rule(
                    idx as i64 + 1,
                    "amount",
                    Operator::Gt,
                    serde_json::json!(threshold),
                    priority,
                )
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn rete_and_linear_agree_on_which_rules_match(rules in arb_rule_set(), amount in 0i64..200) {
        let mut net = ReteNetwork::new();
        net.compile(&rules).unwrap();

        let event = serde_json::json!({"amount": amount});
        let event = event.as_object().unwrap();

        let rete_ids: BTreeSet<i64> = net.evaluate(event).matched.into_iter().map(|m| m.rule_id).collect();
        let linear_ids: BTreeSet<i64> = evaluate_simple(&rules, event).into_iter().collect();

        prop_assert_eq!(rete_ids, linear_ids);
    }
}
