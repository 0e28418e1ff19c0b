use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One event run through the engine, grounded in `schemas/rule.py`'s
/// `SimulateResponse`: which rules matched, the order they'd fire in, and
/// (when requested) a per-rule explanation of why.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MatchReport {
    pub matched_rules: Vec<rete_net::RuleMatch>,
    pub execution_order: Vec<i64>,
    pub explanations: HashMap<i64, String>,
    pub dry_run: bool,
    pub stats: EvaluationStats,
}

/// Per-call counters, spec §6's `stats` block. `alpha_nodes`/`beta_nodes`/
/// `shared_conditions` are only populated on the RETE path; the linear
/// path leaves them `None` since there is no compiled network to report.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EvaluationStats {
    pub total_rules: usize,
    pub rules_matched: usize,
    pub evaluation_time_ms: f64,
    pub optimization: Optimization,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta_nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_conditions: Option<usize>,
    /// Set when the remote cache tier was unreachable for this call and
    /// the engine fell back to the local tier / source of truth (spec §7
    /// error kind 3: degrade silently, report via a status flag).
    pub cache_degraded: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Optimization {
    Rete,
    Linear,
}

impl Default for Optimization {
    fn default() -> Self {
        Optimization::Rete
    }
}
