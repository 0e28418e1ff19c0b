//! The RETE discrimination network (spec §4.2–§4.3): alpha-node sharing,
//! beta joins/negation, terminal ordering. Arena + index pattern per the
//! spec's redesign flag — nodes live in plain `Vec`s owned by the network,
//! rules reference them by index, and per-evaluation state (alpha/beta
//! memory) is local to each `evaluate` call rather than mutated on the
//! nodes, so the compiled network can be read concurrently by many
//! evaluators while a writer recompiles it.

use crate::error::CompileError;
use crate::types::{
    AlphaId, AlphaNode, BetaId, BetaKind, BetaNode, EvaluationResult, NetworkStats, RuleMatch,
    TerminalNode,
};
use conditions::{AtomicCondition, Condition, Connective};
use rule_model::Rule;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub struct ReteNetwork {
    alphas: Vec<AlphaNode>,
    alpha_index: HashMap<AtomicCondition, AlphaId>,
    field_to_alphas: HashMap<String, Vec<AlphaId>>,
    betas: Vec<BetaNode>,
    terminals: Vec<TerminalNode>,
    rules_hash: Option<String>,
    stats: NetworkStats,
}

/// Whether a `compile` call actually rebuilt the network or found the rule
/// set unchanged (by hash) and left it alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompileOutcome {
    Recompiled,
    Unchanged,
}

impl ReteNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_compiled(&self) -> bool {
        self.rules_hash.is_some()
    }

    pub fn stats(&self) -> NetworkStats {
        self.stats.clone()
    }

    /// Fingerprint of the active rule set. `rule-cache`/`rule-engine` use
    /// this to decide whether a recompile is even worth attempting.
    pub fn rules_hash(&self) -> Option<&str> {
        self.rules_hash.as_deref()
    }

    /// Rebuild the network from the given rules, unless their hash matches
    /// what is already compiled. Idempotent: compiling the same rule set
    /// twice in a row is a no-op after the first call.
    pub fn compile(&mut self, rules: &[Rule]) -> Result<CompileOutcome, CompileError> {
        let hash = Self::hash_rules(rules);
        if self.rules_hash.as_deref() == Some(hash.as_str()) {
            tracing::debug!("rule set hash unchanged, skipping recompile");
            return Ok(CompileOutcome::Unchanged);
        }

        let mut seen_ids = HashSet::new();
        for rule in rules {
            if !seen_ids.insert(rule.id) {
                return Err(CompileError::DuplicateRuleId(rule.id));
            }
        }

        self.clear();
        for rule in rules {
            self.add_rule(rule);
        }
        self.rules_hash = Some(hash);
        self.stats.total_rules = rules.len();
        self.stats.compile_count += 1;
        tracing::info!(
            rules = rules.len(),
            alpha_nodes = self.alphas.len(),
            beta_nodes = self.betas.len(),
            "compiled rete network"
        );
        Ok(CompileOutcome::Recompiled)
    }

    fn clear(&mut self) {
        self.alphas.clear();
        self.alpha_index.clear();
        self.field_to_alphas.clear();
        self.betas.clear();
        self.terminals.clear();
    }

    fn add_rule(&mut self, rule: &Rule) {
        let root = self.build_condition_network(&rule.condition_dsl);
        self.terminals.push(TerminalNode {
            rule_id: rule.id,
            name: rule.name.clone(),
            priority: rule.priority,
            group: rule.group.clone(),
            action: rule.action.clone(),
            root,
        });
    }

    fn build_condition_network(&mut self, condition: &Condition) -> BetaId {
        match condition {
            Condition::Condition(atomic) => {
                let alpha = self.get_or_create_alpha(atomic);
                self.push_beta(BetaNode {
                    kind: BetaKind::AlphaLeaf(alpha),
                    is_negated: false,
                })
            }
            Condition::Group(group) => {
                if group.children.is_empty() {
                    return self.push_beta(BetaNode {
                        kind: BetaKind::Join {
                            op: Connective::And,
                            parents: Vec::new(),
                        },
                        is_negated: false,
                    });
                }
                if group.op == Connective::Not {
                    // Arity is enforced by `conditions::validate` before a
                    // rule ever reaches the network; here we only use the
                    // first child, matching the original's behavior of
                    // marking that child's node negated in place rather
                    // than allocating a wrapper. A nested NOT(NOT(x)) sets
                    // this flag to `true` twice rather than toggling it,
                    // which is the original's behavior, not a new choice.
                    let child = self.build_condition_network(&group.children[0]);
                    self.betas[child.0].is_negated = true;
                    return child;
                }
                let parents: Vec<BetaId> = group
                    .children
                    .iter()
                    .map(|child| self.build_condition_network(child))
                    .collect();
                self.push_beta(BetaNode {
                    kind: BetaKind::Join {
                        op: group.op,
                        parents,
                    },
                    is_negated: false,
                })
            }
        }
    }

    fn get_or_create_alpha(&mut self, atomic: &AtomicCondition) -> AlphaId {
        if let Some(&id) = self.alpha_index.get(atomic) {
            self.stats.shared_alpha_hits += 1;
            return id;
        }
        let id = AlphaId(self.alphas.len());
        self.alphas.push(AlphaNode {
            condition: atomic.clone(),
        });
        self.alpha_index.insert(atomic.clone(), id);
        self.field_to_alphas
            .entry(atomic.field.clone())
            .or_default()
            .push(id);
        self.stats.total_alpha_nodes = self.alphas.len();
        id
    }

    fn push_beta(&mut self, node: BetaNode) -> BetaId {
        let id = BetaId(self.betas.len());
        self.betas.push(node);
        self.stats.total_beta_nodes = self.betas.len();
        id
    }

    /// Fingerprint used to decide whether `compile` needs to do any work.
    /// Built from every field that would change the shape of the network
    /// or a terminal's payload, not just ids/versions.
    fn hash_rules(rules: &[Rule]) -> String {
        let snapshot: Vec<serde_json::Value> = rules
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.id,
                    "priority": r.priority,
                    "enabled": r.enabled,
                    "group": r.group,
                    "condition_dsl": r.condition_dsl,
                    "action": r.action,
                    "current_version": r.current_version,
                })
            })
            .collect();
        conditions::hash_value(&serde_json::Value::Array(snapshot))
    }

    /// Run an event through the compiled network: alpha phase restricted
    /// to the event's own keys (plus any alpha not yet touched, which
    /// covers `exists`/`not_exists`), memoized beta phase, terminal
    /// collection sorted by descending priority.
    pub fn evaluate(&self, event: &serde_json::Map<String, serde_json::Value>) -> EvaluationResult {
        let mut evaluated = HashSet::new();
        let mut alpha_memory = HashSet::new();

        for key in event.keys() {
            if let Some(ids) = self.field_to_alphas.get(key) {
                for &id in ids {
                    if evaluated.insert(id) && self.evaluate_alpha(id, event) {
                        alpha_memory.insert(id);
                    }
                }
            }
        }
        // Alphas on fields absent from the event still need evaluating:
        // `exists`/`not_exists` and comparisons against a missing field
        // both have a defined (false-leaning) outcome.
        for idx in 0..self.alphas.len() {
            let id = AlphaId(idx);
            if evaluated.insert(id) && self.evaluate_alpha(id, event) {
                alpha_memory.insert(id);
            }
        }

        let mut beta_memo = HashMap::new();
        let mut matched: Vec<&TerminalNode> = self
            .terminals
            .iter()
            .filter(|t| self.evaluate_beta(t.root, &alpha_memory, &mut beta_memo))
            .collect();
        matched.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.rule_id.cmp(&b.rule_id)));

        EvaluationResult {
            matched: matched
                .into_iter()
                .map(|t| RuleMatch {
                    rule_id: t.rule_id,
                    name: t.name.clone(),
                    priority: t.priority,
                    group: t.group.clone(),
                    action: t.action.clone(),
                })
                .collect(),
        }
    }

    fn evaluate_alpha(&self, id: AlphaId, event: &serde_json::Map<String, serde_json::Value>) -> bool {
        let atomic = &self.alphas[id.0].condition;
        conditions::evaluate(&Condition::Condition(atomic.clone()), event)
    }

    fn evaluate_beta(
        &self,
        id: BetaId,
        alpha_memory: &HashSet<AlphaId>,
        memo: &mut HashMap<BetaId, bool>,
    ) -> bool {
        if let Some(&cached) = memo.get(&id) {
            return cached;
        }
        let node = &self.betas[id.0];
        let raw = match &node.kind {
            BetaKind::AlphaLeaf(alpha_id) => alpha_memory.contains(alpha_id),
            BetaKind::Join { op, parents } => {
                if parents.is_empty() {
                    true
                } else {
                    match op {
                        Connective::And => parents
                            .iter()
                            .all(|&p| self.evaluate_beta(p, alpha_memory, memo)),
                        Connective::Or => parents
                            .iter()
                            .any(|&p| self.evaluate_beta(p, alpha_memory, memo)),
                        Connective::Not => unreachable!("NOT never reaches a join node"),
                    }
                }
            }
        };
        let result = if node.is_negated { !raw } else { raw };
        memo.insert(id, result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use conditions::Operator;
    use serde_json::json;

    fn rule(id: i64, field: &str, op: Operator, value: serde_json::Value, priority: i32) -> Rule {
        Rule {
            id,
            name: format!("rule-{id}"),
            description: None,
            group: None,
            priority,
            enabled: true,
            condition_dsl: Condition::atomic(field, op, value),
            action: json!({"type": "noop"}),
            rule_metadata: json!({}),
            current_version: 1,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn event(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn compile_is_idempotent_for_unchanged_rules() {
        let rules = vec![rule(1, "amount", Operator::Gt, json!(100), 10)];
        let mut net = ReteNetwork::new();
        assert_eq!(net.compile(&rules).unwrap(), CompileOutcome::Recompiled);
        assert_eq!(net.compile(&rules).unwrap(), CompileOutcome::Unchanged);
    }

    #[test]
    fn shared_alpha_node_across_two_rules() {
        let rules = vec![
            rule(1, "amount", Operator::Gt, json!(1000), 10),
            rule(2, "amount", Operator::Gt, json!(1000), 5),
        ];
        let mut net = ReteNetwork::new();
        net.compile(&rules).unwrap();
        assert_eq!(net.stats().total_alpha_nodes, 1);
        assert_eq!(net.stats().shared_alpha_hits, 1);
    }

    #[test]
    fn matches_sorted_by_descending_priority() {
        let rules = vec![
            rule(1, "amount", Operator::Gt, json!(10), 1),
            rule(2, "amount", Operator::Gt, json!(10), 99),
        ];
        let mut net = ReteNetwork::new();
        net.compile(&rules).unwrap();
        let result = net.evaluate(&event(json!({"amount": 20})));
        assert_eq!(result.matched.len(), 2);
        assert_eq!(result.matched[0].rule_id, 2);
        assert_eq!(result.matched[1].rule_id, 1);
    }

    #[test]
    fn not_group_negates_single_child() {
        let mut rules = vec![rule(1, "status", Operator::Eq, json!("closed"), 1)];
        rules[0].condition_dsl = Condition::group(
            Connective::Not,
            vec![Condition::atomic("status", Operator::Eq, json!("closed"))],
        );
        let mut net = ReteNetwork::new();
        net.compile(&rules).unwrap();

        assert!(net
            .evaluate(&event(json!({"status": "open"})))
            .matched
            .iter()
            .any(|m| m.rule_id == 1));
        assert!(!net
            .evaluate(&event(json!({"status": "closed"})))
            .matched
            .iter()
            .any(|m| m.rule_id == 1));
    }

    #[test]
    fn duplicate_rule_ids_are_rejected() {
        let rules = vec![
            rule(1, "a", Operator::Exists, serde_json::Value::Null, 1),
            rule(1, "b", Operator::Exists, serde_json::Value::Null, 2),
        ];
        let mut net = ReteNetwork::new();
        assert!(net.compile(&rules).is_err());
    }
}
