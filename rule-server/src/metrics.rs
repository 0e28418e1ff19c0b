//! Metrics counters (spec SPEC_FULL.md §6.3), grounded in
//! `original_source`'s `utils/metrics.py`
//! (`increment_events_processed`/`increment_rules_fired`/
//! `observe_processing_time`). Exposed as JSON through `/metrics` rather
//! than a Prometheus text exporter — a full exporter is out of proportion
//! to what this veneer needs.
//!
//! Cache hit/miss counters are not tracked here: `rule-cache::RuleCache`
//! already counts them per tier (spec §4.5's own stats), so `snapshot`
//! takes that count rather than duplicating it behind a second counter
//! that would inevitably drift from the real thing.

use parking_lot::Mutex;
use rule_engine::CacheStatsSnapshot;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct Metrics {
    events_processed_total: AtomicU64,
    rules_fired_total: AtomicU64,
    /// Evaluation durations in seconds, sampled for a crude histogram
    /// summary. Bounded so a long-running process doesn't grow this
    /// unboundedly; the oldest samples are dropped once full.
    evaluation_duration_samples: Mutex<Vec<f64>>,
}

const MAX_SAMPLES: usize = 1000;

impl Metrics {
    pub fn record_evaluation(&self, rules_matched: usize, duration_seconds: f64) {
        self.events_processed_total.fetch_add(1, Ordering::Relaxed);
        self.rules_fired_total
            .fetch_add(rules_matched as u64, Ordering::Relaxed);
        let mut samples = self.evaluation_duration_samples.lock();
        if samples.len() >= MAX_SAMPLES {
            samples.remove(0);
        }
        samples.push(duration_seconds);
    }

    pub fn snapshot(&self, cache: CacheStatsSnapshot) -> MetricsSnapshot {
        let samples = self.evaluation_duration_samples.lock();
        let count = samples.len();
        let sum: f64 = samples.iter().sum();
        let avg = if count > 0 { sum / count as f64 } else { 0.0 };

        let mut cache_hit_total = HashMap::new();
        cache_hit_total.insert("local", cache.local_hits);
        cache_hit_total.insert("remote", cache.remote_hits);
        let mut cache_miss_total = HashMap::new();
        cache_miss_total.insert("local", cache.local_misses);
        cache_miss_total.insert("remote", cache.remote_misses);

        MetricsSnapshot {
            events_processed_total: self.events_processed_total.load(Ordering::Relaxed),
            rules_fired_total: self.rules_fired_total.load(Ordering::Relaxed),
            evaluation_duration_seconds: HistogramSummary { count, sum, avg },
            cache_hit_total,
            cache_miss_total,
            cache_remote_unavailable_total: cache.remote_unavailable,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct HistogramSummary {
    pub count: usize,
    pub sum: f64,
    pub avg: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct MetricsSnapshot {
    pub events_processed_total: u64,
    pub rules_fired_total: u64,
    pub evaluation_duration_seconds: HistogramSummary,
    pub cache_hit_total: HashMap<&'static str, u64>,
    pub cache_miss_total: HashMap<&'static str, u64>,
    pub cache_remote_unavailable_total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_events_and_rules_fired() {
        let metrics = Metrics::default();
        metrics.record_evaluation(3, 0.01);
        metrics.record_evaluation(0, 0.02);
        let snapshot = metrics.snapshot(CacheStatsSnapshot::default());
        assert_eq!(snapshot.events_processed_total, 2);
        assert_eq!(snapshot.rules_fired_total, 3);
        assert_eq!(snapshot.evaluation_duration_seconds.count, 2);
    }

    #[test]
    fn cache_counters_are_taken_from_the_cache_snapshot() {
        let metrics = Metrics::default();
        let cache = CacheStatsSnapshot {
            local_hits: 4,
            local_misses: 1,
            remote_hits: 2,
            remote_misses: 3,
            remote_unavailable: 1,
        };
        let snapshot = metrics.snapshot(cache);
        assert_eq!(snapshot.cache_hit_total.get("local"), Some(&4));
        assert_eq!(snapshot.cache_miss_total.get("local"), Some(&1));
        assert_eq!(snapshot.cache_hit_total.get("remote"), Some(&2));
        assert_eq!(snapshot.cache_remote_unavailable_total, 1);
    }
}
