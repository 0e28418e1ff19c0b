//! The orchestrator (spec §4 overview): ties `rule-store`, `rule-cache`,
//! `rete-net`, `conflict-detector`, and `dep-graph` together behind one
//! `evaluate` entry point and the lifecycle operations that keep them in
//! sync. Grounded in `optimized_rete_engine.py`'s `OptimizedReteEngine`.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::explain::explain;
use crate::report::{EvaluationStats, MatchReport, Optimization};
use crate::stats::{EngineStats, EngineStatsSnapshot};
use conflict_detector::{
    check_new_rule_conflicts, check_update_rule_conflicts, detect_all_conflicts, Conflict,
    ConditionHashCache,
};
use dep_graph::DependencyGraph;
use parking_lot::RwLock;
use rete_net::{evaluate_simple, NetworkStats, ReteNetwork, RuleMatch};
use rule_cache::{CacheKey, CacheStatsSnapshot, NoopRemoteTier, RuleCache};
use rule_model::{FieldDiff, Rule, RuleDraft, RuleLifecycleEvent, RuleVersion};
use rule_store::RuleStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Per-call knobs for `evaluate`, all optional: absent values fall back to
/// engine defaults.
#[derive(Clone, Debug, Default)]
pub struct EvaluateOptions {
    pub group: Option<String>,
    pub rule_ids: Option<Vec<i64>>,
    pub use_rete: Option<bool>,
    pub explain: bool,
    pub dry_run: bool,
}

pub struct RuleEngine {
    store: RuleStore,
    cache: RuleCache,
    network: RwLock<ReteNetwork>,
    hash_cache: ConditionHashCache,
    stats: EngineStats,
    config: EngineConfig,
}

impl RuleEngine {
    pub fn new(store: RuleStore, config: EngineConfig) -> Self {
        RuleEngine {
            cache: RuleCache::new(config.local_cache_ttl, Arc::new(NoopRemoteTier)),
            network: RwLock::new(ReteNetwork::new()),
            hash_cache: ConditionHashCache::new(ConditionHashCache::DEFAULT_TTL),
            stats: EngineStats::default(),
            store,
            config,
        }
    }

    pub fn evaluate(
        &self,
        event: &serde_json::Value,
        options: EvaluateOptions,
    ) -> Result<MatchReport, EngineError> {
        let start = Instant::now();
        let group = options.group.clone();
        let key = CacheKey::for_group(group.as_deref());
        let store = &self.store;
        let loaded = self
            .cache
            .get_or_load_tracked(key, || store.load_enabled_rules(group.as_deref()).unwrap_or_default());
        let mut rules = loaded.rules;

        if let Some(ids) = &options.rule_ids {
            rules.retain(|r| ids.contains(&r.id));
        }

        let total_rules = rules.len();
        let event_obj = event.as_object().cloned().unwrap_or_default();
        let use_rete = options.use_rete.unwrap_or(self.config.use_rete_by_default);

        let mut network_stats = None;
        let matched_rules: Vec<RuleMatch> = if use_rete {
            let mut network = self.network.write();
            network.compile(&rules)?;
            let result = network.evaluate(&event_obj);
            network_stats = Some(network.stats());
            result.matched
        } else {
            let by_id: HashMap<i64, &Rule> = rules.iter().map(|r| (r.id, r)).collect();
            evaluate_simple(&rules, &event_obj)
                .into_iter()
                .filter_map(|id| {
                    by_id.get(&id).map(|r| RuleMatch {
                        rule_id: r.id,
                        name: r.name.clone(),
                        priority: r.priority,
                        group: r.group.clone(),
                        action: r.action.clone(),
                    })
                })
                .collect()
        };

        let execution_order = matched_rules.iter().map(|m| m.rule_id).collect();

        let explanations = if options.explain {
            let by_id: HashMap<i64, &Rule> = rules.iter().map(|r| (r.id, r)).collect();
            matched_rules
                .iter()
                .filter_map(|m| {
                    by_id
                        .get(&m.rule_id)
                        .map(|r| (r.id, explain(&r.condition_dsl, &event_obj)))
                })
                .collect()
        } else {
            HashMap::new()
        };

        let duration_micros = start.elapsed().as_micros() as u64;
        self.stats.record(matched_rules.len(), duration_micros);

        let stats = EvaluationStats {
            total_rules,
            rules_matched: matched_rules.len(),
            evaluation_time_ms: duration_micros as f64 / 1000.0,
            optimization: if use_rete {
                Optimization::Rete
            } else {
                Optimization::Linear
            },
            alpha_nodes: network_stats.as_ref().map(|s| s.total_alpha_nodes),
            beta_nodes: network_stats.as_ref().map(|s| s.total_beta_nodes),
            shared_conditions: network_stats.as_ref().map(|s| s.shared_alpha_hits),
            cache_degraded: loaded.degraded,
        };

        Ok(MatchReport {
            matched_rules,
            execution_order,
            explanations,
            dry_run: options.dry_run,
            stats,
        })
    }

    pub fn create_rule(&self, draft: RuleDraft, created_by: Option<i64>) -> Result<Rule, EngineError> {
        let (rule, event) = self.store.create_rule(draft, created_by)?;
        self.apply_lifecycle(event);
        Ok(rule)
    }

    pub fn update_rule(&self, id: i64, draft: RuleDraft) -> Result<Rule, EngineError> {
        let (rule, event) = self.store.update_rule(id, draft)?;
        self.apply_lifecycle(event);
        Ok(rule)
    }

    pub fn delete_rule(&self, id: i64) -> Result<(), EngineError> {
        let event = self.store.delete_rule(id)?;
        self.apply_lifecycle(event);
        Ok(())
    }

    pub fn get_rule(&self, id: i64) -> Result<Option<Rule>, EngineError> {
        Ok(self.store.get_rule(id)?)
    }

    pub fn list_rules(
        &self,
        skip: i64,
        limit: i64,
        group: Option<&str>,
        enabled: Option<bool>,
    ) -> Result<Vec<Rule>, EngineError> {
        Ok(self.store.list_rules(skip, limit, group, enabled)?)
    }

    pub fn get_rule_versions(&self, id: i64) -> Result<Vec<RuleVersion>, EngineError> {
        Ok(self.store.get_rule_versions(id)?)
    }

    pub fn get_rule_version(&self, id: i64, version: i32) -> Result<RuleVersion, EngineError> {
        Ok(self.store.get_rule_version(id, version)?)
    }

    pub fn get_version_diff(&self, id: i64, from: i32, to: i32) -> Result<Vec<FieldDiff>, EngineError> {
        Ok(self.store.get_version_diff(id, from, to)?)
    }

    pub fn check_conflicts_for_new_rule(&self, candidate: &Rule) -> Result<Vec<Conflict>, EngineError> {
        let existing = self.store.load_enabled_rules(None)?;
        Ok(check_new_rule_conflicts(&existing, candidate, &self.hash_cache))
    }

    pub fn check_conflicts_for_update(&self, candidate: &Rule) -> Result<Vec<Conflict>, EngineError> {
        let existing = self.store.load_enabled_rules(None)?;
        Ok(check_update_rule_conflicts(&existing, candidate, &self.hash_cache))
    }

    pub fn detect_all_conflicts(&self) -> Result<Vec<Conflict>, EngineError> {
        let rules = self.store.load_enabled_rules(None)?;
        Ok(detect_all_conflicts(&rules))
    }

    pub fn dependency_graph(&self) -> Result<DependencyGraph, EngineError> {
        let rules = self.store.load_enabled_rules(None)?;
        Ok(dep_graph::build_graph(&rules))
    }

    pub fn network_stats(&self) -> NetworkStats {
        self.network.read().stats()
    }

    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.cache.stats()
    }

    pub fn engine_stats(&self) -> EngineStatsSnapshot {
        self.stats.snapshot()
    }

    fn apply_lifecycle(&self, event: RuleLifecycleEvent) {
        for group in event.affected_groups() {
            self.cache.invalidate(group.as_deref());
        }
        self.hash_cache.invalidate();
        tracing::debug!(rule_id = event.rule_id(), "lifecycle event applied");
    }
}
