//! The cached condition-hash map (spec §4.6's "optimized" path), grounded
//! in the original's `ConflictCache` (TTL 30s). Duplicate-condition
//! checking against every existing rule is the expensive part of
//! conflict detection; this cache lets `check_new_rule_conflicts` avoid
//! recomputing every rule's hash on every single incoming rule.

use parking_lot::Mutex;
use rule_model::Rule;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Entry {
    hashes: Arc<HashMap<i64, String>>,
    inserted_at: Instant,
}

pub struct ConditionHashCache {
    ttl: Duration,
    entry: Mutex<Option<Entry>>,
}

impl ConditionHashCache {
    /// TTL matching the original's `ConflictCache(ttl_seconds=30)`.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

    pub fn new(ttl: Duration) -> Self {
        ConditionHashCache {
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// The condition hash of every enabled rule, recomputed only when the
    /// cache is empty or stale.
    pub fn get_or_compute(&self, rules: &[Rule]) -> Arc<HashMap<i64, String>> {
        let mut guard = self.entry.lock();
        if let Some(entry) = guard.as_ref() {
            if entry.inserted_at.elapsed() <= self.ttl {
                return entry.hashes.clone();
            }
        }
        let hashes: HashMap<i64, String> = rules
            .iter()
            .filter(|r| r.enabled)
            .map(|r| (r.id, conditions::hash_condition(&r.condition_dsl)))
            .collect();
        let hashes = Arc::new(hashes);
        *guard = Some(Entry {
            hashes: hashes.clone(),
            inserted_at: Instant::now(),
        });
        hashes
    }

    pub fn invalidate(&self) {
        *self.entry.lock() = None;
    }
}

impl Default for ConditionHashCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use conditions::{Condition, Operator};

    fn rule(id: i64) -> Rule {
        Rule {
            id,
            name: format!("rule-{id}"),
            description: None,
            group: None,
            priority: 1,
            enabled: true,
            condition_dsl: Condition::atomic("x", Operator::Gt, serde_json::json!(1)),
            action: serde_json::json!({}),
            rule_metadata: serde_json::json!({}),
            current_version: 1,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn recomputes_only_after_ttl_expires() {
        let cache = ConditionHashCache::new(Duration::from_millis(1));
        let rules = vec![rule(1)];
        let first = cache.get_or_compute(&rules);
        assert_eq!(first.len(), 1);

        std::thread::sleep(Duration::from_millis(5));
        let rules2 = vec![rule(1), rule(2)];
        let second = cache.get_or_compute(&rules2);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn disabled_rules_are_excluded() {
        let cache = ConditionHashCache::default();
        let mut rules = vec![rule(1), rule(2)];
        rules[1].enabled = false;
        let hashes = cache.get_or_compute(&rules);
        assert_eq!(hashes.len(), 1);
        assert!(hashes.contains_key(&1));
    }
}
