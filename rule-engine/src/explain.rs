//! Human-readable explanations of why a condition tree matched (or
//! didn't), grounded in the original's `_generate_explanation`/
//! `_explain_condition`: a parenthesized walk of the tree that
//! substitutes the event's actual values in next to each field.

use conditions::{AtomicCondition, Condition, Connective, Operator};
use serde_json::Value;

pub fn explain(condition: &Condition, event: &serde_json::Map<String, Value>) -> String {
    match condition {
        Condition::Condition(atomic) => explain_atomic(atomic, event),
        Condition::Group(group) => {
            let joined = |sep: &str| {
                group
                    .children
                    .iter()
                    .map(|c| explain(c, event))
                    .collect::<Vec<_>>()
                    .join(sep)
            };
            match group.op {
                Connective::And => format!("({})", joined(" AND ")),
                Connective::Or => format!("({})", joined(" OR ")),
                Connective::Not => match group.children.first() {
                    Some(child) => format!("NOT ({})", explain(child, event)),
                    None => "NOT (true)".to_string(),
                },
            }
        }
    }
}

fn explain_atomic(atomic: &AtomicCondition, event: &serde_json::Map<String, Value>) -> String {
    let actual = event
        .get(&atomic.field)
        .map(display)
        .unwrap_or_else(|| "<missing>".to_string());
    let expected = display(&atomic.value);
    format!(
        "{}({}) {} {}",
        atomic.field,
        actual,
        operator_symbol(atomic.op),
        expected
    )
}

fn operator_symbol(op: Operator) -> &'static str {
    match op {
        Operator::Eq => "==",
        Operator::Ne => "!=",
        Operator::Gt => ">",
        Operator::Ge => ">=",
        Operator::Lt => "<",
        Operator::Le => "<=",
        Operator::In => "in",
        Operator::NotIn => "not in",
        Operator::Contains => "contains",
        Operator::StartsWith => "starts_with",
        Operator::EndsWith => "ends_with",
        Operator::Regex => "matches",
        Operator::Exists => "exists",
        Operator::NotExists => "does not exist",
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
