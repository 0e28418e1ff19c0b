//! Property tests: every condition tree we can build survives a JSON
//! round trip, and the duplicate-detection hash only depends on tree
//! shape, not on incidental JSON formatting.

use conditions::{hash_condition, Condition, Connective, Operator};
use proptest::prelude::*;

fn arb_operator() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::Eq),
        Just(Operator::Ne),
        Just(Operator::Gt),
        Just(Operator::Ge),
        Just(Operator::Lt),
        Just(Operator::Le),
        Just(Operator::In),
        Just(Operator::NotIn),
        Just(Operator::Contains),
        Just(Operator::StartsWith),
        Just(Operator::EndsWith),
        Just(Operator::Regex),
        Just(Operator::Exists),
        Just(Operator::NotExists),
    ]
}

fn arb_value() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        "[a-z]{0,8}".prop_map(serde_json::Value::from),
    ]
}

fn arb_atomic() -> impl Strategy<Value = Condition> {
    ("[a-z_]{1,12}", arb_operator(), arb_value())
        .prop_map(|(field, op, value)| Condition::atomic(field, op, value))
}

fn arb_condition() -> impl Strategy<Value = Condition> {
    let leaf = arb_atomic();
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (
                prop_oneof![Just(Connective::And), Just(Connective::Or)],
                prop::collection::vec(inner.clone(), 0..4),
            )
                .prop_map(|(op, children)| Condition::group(op, children)),
            inner
                .clone()
                .prop_map(|child| Condition::group(Connective::Not, vec![child])),
        ]
    })
}

proptest! {
    #[test]
    fn json_round_trip_preserves_tree(tree in arb_condition()) {
        let json = serde_json::to_string(&tree).unwrap();
        let back: Condition = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(tree, back);
    }

    #[test]
    fn hash_is_stable_across_reparse(tree in arb_condition()) {
        let json = serde_json::to_string(&tree).unwrap();
        let back: Condition = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(hash_condition(&tree), hash_condition(&back));
    }
}
