//! The two-tier rule cache (spec §4.5): a short-TTL process-local tier
//! backed by a longer-TTL best-effort remote tier, with the rule store
//! itself as the ultimate source of truth. A single `parking_lot::Mutex`
//! guards the local tier so readers and writers cross at one auditable
//! lock boundary, per §5.

use crate::key::CacheKey;
use crate::remote::{NoopRemoteTier, RemoteOutcome, RemoteTier};
use parking_lot::Mutex;
use rule_model::Rule;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct LocalEntry {
    rules: Vec<Rule>,
    inserted_at: Instant,
}

/// Cache hit/miss counters per tier, exposed through `rule-server`'s
/// `/metrics` handler (spec §6.3).
#[derive(Default)]
pub struct CacheStats {
    pub local_hits: AtomicU64,
    pub local_misses: AtomicU64,
    pub remote_hits: AtomicU64,
    pub remote_misses: AtomicU64,
    pub remote_unavailable: AtomicU64,
}

impl CacheStats {
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            local_hits: self.local_hits.load(Ordering::Relaxed),
            local_misses: self.local_misses.load(Ordering::Relaxed),
            remote_hits: self.remote_hits.load(Ordering::Relaxed),
            remote_misses: self.remote_misses.load(Ordering::Relaxed),
            remote_unavailable: self.remote_unavailable.load(Ordering::Relaxed),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CacheStatsSnapshot {
    pub local_hits: u64,
    pub local_misses: u64,
    pub remote_hits: u64,
    pub remote_misses: u64,
    pub remote_unavailable: u64,
}

/// Result of a `get_or_load` call: the rules plus whether the remote tier
/// was consulted and found unavailable on this call (spec §7.3 — reported
/// to the caller as a status flag, never as an error).
pub struct Loaded {
    pub rules: Vec<Rule>,
    pub degraded: bool,
}

pub struct RuleCache {
    local: Mutex<HashMap<CacheKey, LocalEntry>>,
    local_ttl: Duration,
    remote: Arc<dyn RemoteTier>,
    stats: CacheStats,
}

impl RuleCache {
    /// Local TTL matching the original's in-process cache (60s).
    pub const DEFAULT_LOCAL_TTL: Duration = Duration::from_secs(60);
    /// Remote TTL matching the original's Redis `CACHE_TTL` (300s).
    pub const DEFAULT_REMOTE_TTL: Duration = Duration::from_secs(300);

    pub fn new(local_ttl: Duration, remote: Arc<dyn RemoteTier>) -> Self {
        RuleCache {
            local: Mutex::new(HashMap::new()),
            local_ttl,
            remote,
            stats: CacheStats::default(),
        }
    }

    pub fn with_no_remote(local_ttl: Duration) -> Self {
        Self::new(local_ttl, Arc::new(NoopRemoteTier))
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// Get the rules for `key`, consulting local then remote tiers before
    /// falling back to `load` (the rule store). A remote hit repopulates
    /// the local tier; a `load` call repopulates both.
    pub fn get_or_load<F>(&self, key: CacheKey, load: F) -> Vec<Rule>
    where
        F: FnOnce() -> Vec<Rule>,
    {
        self.get_or_load_tracked(key, load).rules
    }

    /// Same as [`Self::get_or_load`] but also reports whether the remote
    /// tier degraded (was consulted and found unreachable) on this call.
    pub fn get_or_load_tracked<F>(&self, key: CacheKey, load: F) -> Loaded
    where
        F: FnOnce() -> Vec<Rule>,
    {
        if let Some(rules) = self.read_local(&key) {
            self.stats.local_hits.fetch_add(1, Ordering::Relaxed);
            return Loaded {
                rules,
                degraded: false,
            };
        }
        self.stats.local_misses.fetch_add(1, Ordering::Relaxed);

        match self.remote.get(&key) {
            RemoteOutcome::Hit(rules) => {
                self.stats.remote_hits.fetch_add(1, Ordering::Relaxed);
                self.write_local(key, rules.clone());
                return Loaded {
                    rules,
                    degraded: false,
                };
            }
            RemoteOutcome::Miss => {
                self.stats.remote_misses.fetch_add(1, Ordering::Relaxed);
                let rules = load();
                self.remote.set(&key, &rules);
                self.write_local(key, rules.clone());
                Loaded {
                    rules,
                    degraded: false,
                }
            }
            RemoteOutcome::Unavailable => {
                self.stats.remote_unavailable.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("remote cache tier unavailable, degrading to source of truth");
                let rules = load();
                self.write_local(key, rules.clone());
                Loaded {
                    rules,
                    degraded: true,
                }
            }
        }
    }

    fn read_local(&self, key: &CacheKey) -> Option<Vec<Rule>> {
        let guard = self.local.lock();
        let entry = guard.get(key)?;
        if entry.inserted_at.elapsed() > self.local_ttl {
            return None;
        }
        Some(entry.rules.clone())
    }

    fn write_local(&self, key: CacheKey, rules: Vec<Rule>) {
        let mut guard = self.local.lock();
        guard.insert(
            key,
            LocalEntry {
                rules,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Invalidate a single group (and the `All` key, which may include it),
    /// or everything when `group` is `None`. Called by `rule-engine` in
    /// response to a `RuleLifecycleEvent`.
    pub fn invalidate(&self, group: Option<&str>) {
        let target = group.map(CacheKey::for_group);
        {
            let mut guard = self.local.lock();
            guard.retain(|key, _| !key.affected_by(target.as_ref()));
        }
        self.remote.invalidate(target.as_ref());
        tracing::debug!(?group, "invalidated rule cache");
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
            condition_dsl: Condition::atomic("x", Operator::Exists, serde_json::Value::Null),
            action: serde_json::json!({}),
            rule_metadata: serde_json::json!({}),
            current_version: 1,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn first_call_loads_and_populates_local_cache() {
        let cache = RuleCache::with_no_remote(Duration::from_secs(60));
        let mut load_calls = 0;
        let rules = cache.get_or_load(CacheKey::All, || {
            load_calls += 1;
            vec![rule(1)]
        });
        assert_eq!(rules.len(), 1);
        assert_eq!(load_calls, 1);
        assert_eq!(cache.stats().local_misses, 1);
    }

    #[test]
    fn second_call_within_ttl_hits_local_cache() {
        let cache = RuleCache::with_no_remote(Duration::from_secs(60));
        cache.get_or_load(CacheKey::All, || vec![rule(1)]);

        let mut load_calls = 0;
        let rules = cache.get_or_load(CacheKey::All, || {
            load_calls += 1;
            vec![rule(1)]
        });
        assert_eq!(rules.len(), 1);
        assert_eq!(load_calls, 0, "should not call loader on a cache hit");
        assert_eq!(cache.stats().local_hits, 1);
    }

    #[test]
    fn expired_entry_reloads() {
        let cache = RuleCache::with_no_remote(Duration::from_millis(1));
        cache.get_or_load(CacheKey::All, || vec![rule(1)]);
        std::thread::sleep(Duration::from_millis(5));

        let mut load_calls = 0;
        cache.get_or_load(CacheKey::All, || {
            load_calls += 1;
            vec![rule(1)]
        });
        assert_eq!(load_calls, 1);
    }

    #[test]
    fn invalidating_a_group_drops_its_key_and_the_all_key() {
        let cache = RuleCache::with_no_remote(Duration::from_secs(60));
        cache.get_or_load(CacheKey::All, || vec![rule(1)]);
        cache.get_or_load(CacheKey::for_group(Some("fraud")), || vec![rule(2)]);
        cache.get_or_load(CacheKey::for_group(Some("compliance")), || vec![rule(3)]);

        cache.invalidate(Some("fraud"));

        let mut load_calls = 0;
        cache.get_or_load(CacheKey::All, || {
            load_calls += 1;
            vec![rule(1)]
        });
        assert_eq!(load_calls, 1, "All key should have been dropped too");

        let mut compliance_calls = 0;
        cache.get_or_load(CacheKey::for_group(Some("compliance")), || {
            compliance_calls += 1;
            vec![rule(3)]
        });
        assert_eq!(
            compliance_calls, 0,
            "unrelated group should still be cached"
        );
    }
}
