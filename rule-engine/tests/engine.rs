use conditions::{Condition, Operator};
use rule_engine::{EngineConfig, EvaluateOptions, RuleEngine};
use rule_model::RuleDraft;
use rule_store::RuleStore;

fn draft(name: &str, priority: i32, threshold: i64) -> RuleDraft {
    RuleDraft {
        name: Some(name.to_string()),
        description: None,
        group: None,
        priority: Some(priority),
        enabled: Some(true),
        condition_dsl: Some(Condition::atomic("amount", Operator::Gt, serde_json::json!(threshold))),
        action: Some(serde_json::json!({"type": "flag"})),
        rule_metadata: None,
    }
}

fn engine() -> RuleEngine {
    let store = RuleStore::open_in_memory().unwrap();
    RuleEngine::new(store, EngineConfig::default())
}

#[test]
fn create_and_evaluate_matches_high_priority_first() {
    let engine = engine();
    engine.create_rule(draft("low", 1, 10), None).unwrap();
    engine.create_rule(draft("high", 99, 10), None).unwrap();

    let report = engine
        .evaluate(&serde_json::json!({"amount": 50}), EvaluateOptions::default())
        .unwrap();
    assert_eq!(report.matched_rules.len(), 2);
    assert_eq!(report.matched_rules[0].name, "high");
}

#[test]
fn rete_and_linear_paths_agree() {
    let engine = engine();
    engine.create_rule(draft("a", 1, 10), None).unwrap();
    engine.create_rule(draft("b", 2, 20), None).unwrap();

    let event = serde_json::json!({"amount": 15});
    let rete = engine
        .evaluate(
            &event,
            EvaluateOptions {
                use_rete: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    let linear = engine
        .evaluate(
            &event,
            EvaluateOptions {
                use_rete: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(rete.execution_order, linear.execution_order);
}

#[test]
fn explanations_are_populated_on_request() {
    let engine = engine();
    engine.create_rule(draft("a", 1, 10), None).unwrap();

    let report = engine
        .evaluate(
            &serde_json::json!({"amount": 50}),
            EvaluateOptions {
                explain: true,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(report.explanations.len(), 1);
}

#[test]
fn updating_a_rule_invalidates_the_cache_so_new_matches_are_seen() {
    let engine = engine();
    let rule = engine.create_rule(draft("a", 1, 1000), None).unwrap();

    let before = engine
        .evaluate(&serde_json::json!({"amount": 50}), EvaluateOptions::default())
        .unwrap();
    assert!(before.matched_rules.is_empty());

    let mut lower_threshold = RuleDraft::default();
    lower_threshold.condition_dsl = Some(Condition::atomic("amount", Operator::Gt, serde_json::json!(10)));
    engine.update_rule(rule.id, lower_threshold).unwrap();

    let after = engine
        .evaluate(&serde_json::json!({"amount": 50}), EvaluateOptions::default())
        .unwrap();
    assert_eq!(after.matched_rules.len(), 1);
}

#[test]
fn priority_collision_is_reported_for_a_new_candidate() {
    let engine = engine();
    engine.create_rule(draft("a", 10, 1), None).unwrap();

    let candidate = rule_model::Rule {
        id: 999,
        name: "candidate".into(),
        description: None,
        group: None,
        priority: 10,
        enabled: true,
        condition_dsl: Condition::atomic("amount", Operator::Gt, serde_json::json!(2)),
        action: serde_json::json!({}),
        rule_metadata: serde_json::json!({}),
        current_version: 1,
        created_by: None,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };
    let conflicts = engine.check_conflicts_for_new_rule(&candidate).unwrap();
    assert_eq!(conflicts.len(), 1);
}
