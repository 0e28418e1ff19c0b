//! Duplicate-condition and priority-collision detection (spec §4.6),
//! grounded in `optimized_conflict_detector.py`'s `OptimizedConflictDetector`.

use crate::cache::ConditionHashCache;
use crate::model::{Conflict, ConflictKind};
use rule_model::Rule;
use std::collections::HashMap;

/// All pairwise conflicts among the given (normally: all enabled) rules.
/// Grounded in `detect_all_conflicts`: bucket rules by `(group, priority)`
/// and by condition hash, then emit one conflict per pair sharing a
/// bucket.
pub fn detect_all_conflicts(rules: &[Rule]) -> Vec<Conflict> {
    let enabled: Vec<&Rule> = rules.iter().filter(|r| r.enabled).collect();
    let mut conflicts = Vec::new();

    let mut priority_buckets: HashMap<(String, i32), Vec<&Rule>> = HashMap::new();
    for rule in &enabled {
        priority_buckets
            .entry((rule.group_or_default().to_string(), rule.priority))
            .or_default()
            .push(rule);
    }
    for ((group, priority), bucket) in &priority_buckets {
        emit_pairs(bucket, &mut conflicts, |a, b| Conflict {
            kind: ConflictKind::PriorityCollision,
            rule1_id: a.id,
            rule1_name: a.name.clone(),
            rule2_id: b.id,
            rule2_name: b.name.clone(),
            group: Some(group.clone()),
            priority: Some(*priority),
            description: format!(
                "rules '{}' and '{}' share priority {} in group '{}'",
                a.name, b.name, priority, group
            ),
        });
    }

    let mut condition_buckets: HashMap<String, Vec<&Rule>> = HashMap::new();
    for rule in &enabled {
        condition_buckets
            .entry(conditions::hash_condition(&rule.condition_dsl))
            .or_default()
            .push(rule);
    }
    for bucket in condition_buckets.values() {
        emit_pairs(bucket, &mut conflicts, |a, b| Conflict {
            kind: ConflictKind::DuplicateCondition,
            rule1_id: a.id,
            rule1_name: a.name.clone(),
            rule2_id: b.id,
            rule2_name: b.name.clone(),
            group: None,
            priority: None,
            description: format!(
                "rules '{}' and '{}' have identical conditions",
                a.name, b.name
            ),
        });
    }

    conflicts
}

fn emit_pairs<'a>(
    bucket: &[&'a Rule],
    out: &mut Vec<Conflict>,
    make: impl Fn(&'a Rule, &'a Rule) -> Conflict,
) {
    if bucket.len() < 2 {
        return;
    }
    for i in 0..bucket.len() {
        for j in (i + 1)..bucket.len() {
            out.push(make(bucket[i], bucket[j]));
        }
    }
}

/// Conflicts a brand-new candidate rule would introduce against the
/// existing (enabled) rule set, using the cached condition-hash map for
/// the duplicate-condition check.
pub fn check_new_rule_conflicts(
    existing: &[Rule],
    candidate: &Rule,
    hash_cache: &ConditionHashCache,
) -> Vec<Conflict> {
    check_conflicts_against(existing, candidate, hash_cache, None)
}

/// Same check, but excluding the candidate's own previous row from
/// `existing` — used when validating an in-place update.
pub fn check_update_rule_conflicts(
    existing: &[Rule],
    candidate: &Rule,
    hash_cache: &ConditionHashCache,
) -> Vec<Conflict> {
    check_conflicts_against(existing, candidate, hash_cache, Some(candidate.id))
}

fn check_conflicts_against(
    existing: &[Rule],
    candidate: &Rule,
    hash_cache: &ConditionHashCache,
    exclude_id: Option<i64>,
) -> Vec<Conflict> {
    let others: Vec<&Rule> = existing
        .iter()
        .filter(|r| r.enabled)
        .filter(|r| Some(r.id) != exclude_id)
        .collect();

    let mut conflicts = Vec::new();

    for rule in &others {
        if rule.group_or_default() == candidate.group_or_default() && rule.priority == candidate.priority
        {
            conflicts.push(Conflict {
                kind: ConflictKind::PriorityCollision,
                rule1_id: candidate.id,
                rule1_name: candidate.name.clone(),
                rule2_id: rule.id,
                rule2_name: rule.name.clone(),
                group: Some(candidate.group_or_default().to_string()),
                priority: Some(candidate.priority),
                description: format!(
                    "rule '{}' collides with existing rule '{}' at priority {} in group '{}'",
                    candidate.name,
                    rule.name,
                    candidate.priority,
                    candidate.group_or_default()
                ),
            });
        }
    }

    let candidate_hash = conditions::hash_condition(&candidate.condition_dsl);
    let hashes = hash_cache.get_or_compute(existing);
    for rule in &others {
        if hashes.get(&rule.id).map(String::as_str) == Some(candidate_hash.as_str()) {
            conflicts.push(Conflict {
                kind: ConflictKind::DuplicateCondition,
                rule1_id: candidate.id,
                rule1_name: candidate.name.clone(),
                rule2_id: rule.id,
                rule2_name: rule.name.clone(),
                group: None,
                priority: None,
                description: format!(
                    "rule '{}' duplicates the conditions of existing rule '{}'",
                    candidate.name, rule.name
                ),
            });
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use conditions::{Condition, Operator};

    fn rule(id: i64, group: Option<&str>, priority: i32, threshold: i64) -> Rule {
        Rule {
            id,
            name: format!("rule-{id}"),
            description: None,
            group: group.map(String::from),
            priority,
            enabled: true,
            condition_dsl: Condition::atomic("amount", Operator::Gt, serde_json::json!(threshold)),
            action: serde_json::json!({}),
            rule_metadata: serde_json::json!({}),
            current_version: 1,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn detects_priority_collision_within_same_group() {
        let rules = vec![rule(1, Some("fraud"), 10, 100), rule(2, Some("fraud"), 10, 200)];
        let conflicts = detect_all_conflicts(&rules);
        assert!(conflicts
            .iter()
            .any(|c| c.kind == ConflictKind::PriorityCollision));
    }

    #[test]
    fn no_collision_across_different_groups() {
        let rules = vec![
            rule(1, Some("fraud"), 10, 100),
            rule(2, Some("compliance"), 10, 200),
        ];
        let conflicts = detect_all_conflicts(&rules);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn detects_duplicate_condition() {
        let rules = vec![rule(1, None, 10, 100), rule(2, None, 20, 100)];
        let conflicts = detect_all_conflicts(&rules);
        assert!(conflicts
            .iter()
            .any(|c| c.kind == ConflictKind::DuplicateCondition));
    }

    #[test]
    fn new_rule_check_excludes_nothing() {
        let existing = vec![rule(1, Some("fraud"), 10, 100)];
        let candidate = rule(2, Some("fraud"), 10, 999);
        let cache = ConditionHashCache::default();
        let conflicts = check_new_rule_conflicts(&existing, &candidate, &cache);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::PriorityCollision);
    }

    #[test]
    fn update_check_excludes_candidates_own_row() {
        let existing = vec![rule(1, Some("fraud"), 10, 100)];
        let candidate = rule(1, Some("fraud"), 10, 999);
        let cache = ConditionHashCache::default();
        let conflicts = check_update_rule_conflicts(&existing, &candidate, &cache);
        assert!(conflicts.is_empty());
    }
}
