//! The dependency-graph builder (spec §4.7), grounded in
//! `dependency_graph.py`'s `DependencyGraphBuilder`: two enabled rules are
//! connected when their condition trees reference at least one common
//! field, the edge carrying exactly which fields they share.

use rule_model::Rule;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    pub name: String,
    pub group: Option<String>,
    pub priority: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: i64,
    pub target: i64,
    pub shared_fields: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Build the co-occurrence graph over every enabled rule's referenced
/// fields. `O(n^2)` pairwise comparison, matching the original directly;
/// an inverted `field -> rules` index would get this closer to linear,
/// but at this engine's expected rule-set sizes the straightforward
/// pairwise form is the one worth keeping faithful to.
pub fn build_graph(rules: &[Rule]) -> DependencyGraph {
    let enabled: Vec<&Rule> = rules.iter().filter(|r| r.enabled).collect();

    let nodes = enabled
        .iter()
        .map(|r| Node {
            id: r.id,
            name: r.name.clone(),
            group: r.group.clone(),
            priority: r.priority,
        })
        .collect();

    let field_sets: Vec<_> = enabled
        .iter()
        .map(|r| r.condition_dsl.referenced_fields())
        .collect();

    let mut edges = Vec::new();
    for i in 0..enabled.len() {
        for j in (i + 1)..enabled.len() {
            let shared: Vec<String> = field_sets[i].intersection(&field_sets[j]).cloned().collect();
            if !shared.is_empty() {
                edges.push(Edge {
                    source: enabled[i].id,
                    target: enabled[j].id,
                    shared_fields: shared,
                });
            }
        }
    }

    DependencyGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use conditions::{Condition, Connective, Operator};

    fn rule(id: i64, fields: &[&str]) -> Rule {
        let children = fields
            .iter()
            .map(|f| Condition::atomic(*f, Operator::Exists, serde_json::Value::Null))
            .collect();
        Rule {
            id,
            name: format!("rule-{id}"),
            description: None,
            group: None,
            priority: 1,
            enabled: true,
            condition_dsl: Condition::group(Connective::And, children),
            action: serde_json::json!({}),
            rule_metadata: serde_json::json!({}),
            current_version: 1,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn rules_sharing_a_field_are_connected() {
        let rules = vec![rule(1, &["amount", "currency"]), rule(2, &["amount"])];
        let graph = build_graph(&rules);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].shared_fields, vec!["amount".to_string()]);
    }

    #[test]
    fn rules_with_disjoint_fields_are_not_connected() {
        let rules = vec![rule(1, &["amount"]), rule(2, &["risk_score"])];
        let graph = build_graph(&rules);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn disabled_rules_are_excluded_entirely() {
        let mut rules = vec![rule(1, &["amount"]), rule(2, &["amount"])];
        rules[1].enabled = false;
        let graph = build_graph(&rules);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }
}
