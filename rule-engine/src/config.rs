use std::time::Duration;

/// Engine-wide tunables, loaded from the environment with sane defaults —
/// in the style of the teacher's `build_llm_config_from_env`. There is no
/// config-file format here; the spec only asks for what governs
/// recompilation and caching, not general-purpose configuration.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub local_cache_ttl: Duration,
    pub remote_cache_ttl: Duration,
    pub cache_io_timeout: Duration,
    /// Whether `evaluate` uses the compiled RETE network by default, vs.
    /// the linear conformance evaluator.
    pub use_rete_by_default: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            local_cache_ttl: rule_cache::RuleCache::DEFAULT_LOCAL_TTL,
            remote_cache_ttl: rule_cache::RuleCache::DEFAULT_REMOTE_TTL,
            cache_io_timeout: Duration::from_millis(500),
            use_rete_by_default: true,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let default = EngineConfig::default();
        EngineConfig {
            local_cache_ttl: env_secs("RULE_ENGINE_LOCAL_CACHE_TTL_SECS", default.local_cache_ttl),
            remote_cache_ttl: env_secs("RULE_ENGINE_REMOTE_CACHE_TTL_SECS", default.remote_cache_ttl),
            cache_io_timeout: env_millis("RULE_ENGINE_CACHE_IO_TIMEOUT_MS", default.cache_io_timeout),
            use_rete_by_default: env_bool("RULE_ENGINE_USE_RETE", default.use_rete_by_default),
        }
    }
}

fn env_secs(name: &str, fallback: Duration) -> Duration {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(fallback)
}

fn env_millis(name: &str, fallback: Duration) -> Duration {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(fallback)
}

fn env_bool(name: &str, fallback: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_ttls() {
        let config = EngineConfig::default();
        assert_eq!(config.local_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.remote_cache_ttl, Duration::from_secs(300));
    }
}
