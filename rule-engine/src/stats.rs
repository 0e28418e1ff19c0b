use std::sync::atomic::{AtomicU64, Ordering};

/// Rolling counters for the engine's own view of throughput, distinct from
/// `rete-net`'s compile-time network stats. Grounded in the original's
/// `_update_stats` rolling average over processing time.
#[derive(Default)]
pub struct EngineStats {
    events_processed: AtomicU64,
    rules_fired: AtomicU64,
    evaluations: AtomicU64,
    total_duration_micros: AtomicU64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EngineStatsSnapshot {
    pub events_processed: u64,
    pub rules_fired: u64,
    pub avg_duration_micros: u64,
}

impl EngineStats {
    pub fn record(&self, rules_fired: usize, duration_micros: u64) {
        self.events_processed.fetch_add(1, Ordering::Relaxed);
        self.rules_fired
            .fetch_add(rules_fired as u64, Ordering::Relaxed);
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        self.total_duration_micros
            .fetch_add(duration_micros, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> EngineStatsSnapshot {
        let evaluations = self.evaluations.load(Ordering::Relaxed).max(1);
        EngineStatsSnapshot {
            events_processed: self.events_processed.load(Ordering::Relaxed),
            rules_fired: self.rules_fired.load(Ordering::Relaxed),
            avg_duration_micros: self.total_duration_micros.load(Ordering::Relaxed) / evaluations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_average_tracks_recorded_durations() {
        let stats = EngineStats::default();
        stats.record(2, 100);
        stats.record(0, 300);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.events_processed, 2);
        assert_eq!(snapshot.rules_fired, 2);
        assert_eq!(snapshot.avg_duration_micros, 200);
    }
}
