//! The pure condition evaluator (spec §4.1).
//!
//! Every operator fails closed: a missing field, a type mismatch, or a bad
//! regex pattern evaluates to `false` rather than raising. Nothing here
//! returns `Result` — there is nothing for a caller to recover from.

use crate::model::{AtomicCondition, Condition, Connective, Operator};
use serde_json::Value;
use std::cmp::Ordering;

/// Evaluate a condition tree against an event (a flat or nested JSON object).
pub fn evaluate(condition: &Condition, event: &serde_json::Map<String, Value>) -> bool {
    match condition {
        Condition::Condition(atomic) => evaluate_atomic(atomic, event),
        Condition::Group(group) if group.children.is_empty() => {
            // Matches the RETE leaf's empty-parent join: true regardless
            // of connective.
            true
        }
        Condition::Group(group) => match group.op {
            Connective::And => group.children.iter().all(|c| evaluate(c, event)),
            Connective::Or => group.children.iter().any(|c| evaluate(c, event)),
            Connective::Not => !evaluate(&group.children[0], event),
        },
    }
}

fn evaluate_atomic(atomic: &AtomicCondition, event: &serde_json::Map<String, Value>) -> bool {
    if atomic.op == Operator::Exists {
        return event.contains_key(&atomic.field);
    }
    if atomic.op == Operator::NotExists {
        return !event.contains_key(&atomic.field);
    }

    let Some(field_value) = event.get(&atomic.field) else {
        tracing::debug!(field = %atomic.field, "condition field missing, evaluating to false");
        return false;
    };

    match atomic.op {
        Operator::Eq => field_value == &atomic.value,
        Operator::Ne => field_value != &atomic.value,
        Operator::Gt => compare(field_value, &atomic.value) == Some(Ordering::Greater),
        Operator::Ge => matches!(
            compare(field_value, &atomic.value),
            Some(Ordering::Greater) | Some(Ordering::Equal)
        ),
        Operator::Lt => compare(field_value, &atomic.value) == Some(Ordering::Less),
        Operator::Le => matches!(
            compare(field_value, &atomic.value),
            Some(Ordering::Less) | Some(Ordering::Equal)
        ),
        Operator::In => match atomic.value.as_array() {
            Some(items) => items.iter().any(|item| item == field_value),
            None => false,
        },
        Operator::NotIn => match atomic.value.as_array() {
            Some(items) => !items.iter().any(|item| item == field_value),
            None => false,
        },
        Operator::Contains => evaluate_contains(field_value, &atomic.value),
        Operator::StartsWith => match (display_string(field_value), display_string(&atomic.value))
        {
            (Some(haystack), Some(needle)) => haystack.starts_with(&needle),
            _ => false,
        },
        Operator::EndsWith => match (display_string(field_value), display_string(&atomic.value)) {
            (Some(haystack), Some(needle)) => haystack.ends_with(&needle),
            _ => false,
        },
        Operator::Regex => evaluate_regex(field_value, &atomic.value),
        Operator::Exists | Operator::NotExists => unreachable!("handled above"),
    }
}

fn evaluate_contains(field_value: &Value, needle: &Value) -> bool {
    match field_value {
        Value::Array(items) => items.iter().any(|item| item == needle),
        Value::String(_) => match (display_string(field_value), display_string(needle)) {
            (Some(haystack), Some(needle)) => haystack.contains(&needle),
            _ => false,
        },
        _ => false,
    }
}

fn evaluate_regex(field_value: &Value, pattern: &Value) -> bool {
    let (Some(text), Some(pattern)) = (display_string(field_value), pattern.as_str()) else {
        return false;
    };
    match regex::Regex::new(pattern) {
        // `re.match` semantics: the match must start at position 0, but
        // need not consume the whole string.
        Ok(re) => re.find(&text).map(|m| m.start() == 0).unwrap_or(false),
        Err(error) => {
            tracing::debug!(%pattern, %error, "invalid regex in condition, evaluating to false");
            false
        }
    }
}

/// Numeric comparison if both sides are numbers, lexicographic if both are
/// strings, `None` (type-incompatible) otherwise.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.as_f64()?.partial_cmp(&r.as_f64()?),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

/// Coerce a JSON scalar to its display form for string-shaped operators.
/// Strings pass through unquoted; other scalars use their JSON text.
/// Arrays and objects have no sensible string coercion.
fn display_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
