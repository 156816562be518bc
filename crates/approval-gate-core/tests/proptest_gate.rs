// crates/approval-gate-core/tests/proptest_gate.rs
// ============================================================================
// Module: Gate Property-Based Tests
// Description: Property tests for hash stability and gate invariants.
// Purpose: Check the decision rule and commit idempotence over arbitrary JSON.
// ============================================================================

//! Property-based tests for gate invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use approval_gate_core::Document;
use approval_gate_core::GateConfig;
use approval_gate_core::GateDecision;
use approval_gate_core::RawGateConfig;
use approval_gate_core::commit;
use approval_gate_core::evaluate;
use approval_gate_core::hashing::DEFAULT_HASH_ALGORITHM;
use approval_gate_core::hashing::hash_value;
use proptest::prelude::*;
use serde_json::Value;
use serde_json::json;

fn json_value_strategy(max_depth: u32) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|v| Value::Number(v.into())),
        ".*".prop_map(Value::String),
    ];

    leaf.prop_recursive(max_depth, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0 .. 4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0 .. 4).prop_map(|map| {
                let mut object = serde_json::Map::new();
                for (key, value) in map {
                    object.insert(key, value);
                }
                Value::Object(object)
            }),
        ]
    })
}

fn config() -> GateConfig {
    RawGateConfig::for_path("spec.resources").resolve().unwrap()
}

fn resource(monitored: &Value, status: Value) -> Document {
    let Value::Object(map) = json!({"spec": {"resources": monitored}, "status": status}) else {
        unreachable!("literal is an object");
    };
    map
}

/// Rebuilds every object with its keys inserted in reverse order.
fn reverse_key_order(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut reversed = serde_json::Map::new();
            for (key, inner) in map.iter().rev() {
                reversed.insert(key.clone(), reverse_key_order(inner));
            }
            Value::Object(reversed)
        }
        Value::Array(items) => Value::Array(items.iter().map(reverse_key_order).collect()),
        other => other.clone(),
    }
}

proptest! {
    #[test]
    fn hash_ignores_key_order(value in json_value_strategy(3)) {
        let original = hash_value(DEFAULT_HASH_ALGORITHM, &value).unwrap();
        let reordered = hash_value(DEFAULT_HASH_ALGORITHM, &reverse_key_order(&value)).unwrap();
        prop_assert_eq!(original, reordered);
    }

    #[test]
    fn wrapping_a_value_changes_its_hash(value in json_value_strategy(3)) {
        let original = hash_value(DEFAULT_HASH_ALGORITHM, &value).unwrap();
        let wrapped = hash_value(DEFAULT_HASH_ALGORITHM, &json!([value])).unwrap();
        prop_assert_ne!(original, wrapped);
    }

    #[test]
    fn decision_follows_rule(
        value in json_value_strategy(2),
        approved in proptest::option::of(any::<bool>()),
        stored in proptest::option::of("[a-f0-9]{0,8}"),
        use_current in any::<bool>(),
    ) {
        let current = hash_value(DEFAULT_HASH_ALGORITHM, &value).unwrap();
        let mut status = serde_json::Map::new();
        let stored = if use_current { Some(current.clone()) } else { stored };
        if let Some(hash) = &stored {
            status.insert("currentHash".to_string(), Value::String(hash.clone()));
        }
        if let Some(flag) = approved {
            status.insert("approved".to_string(), Value::Bool(flag));
        }
        let doc = resource(&value, Value::Object(status));

        let outcome = evaluate(&doc, &config()).unwrap();
        let stored = stored.unwrap_or_default();
        let approved = approved.unwrap_or(false);
        let expect_halt = !approved && (stored.is_empty() || stored != current);
        prop_assert_eq!(outcome.decision == GateDecision::Halt, expect_halt);
        prop_assert_eq!(&outcome.current_hash, &current);
        prop_assert_eq!(evaluate(&doc, &config()).unwrap(), outcome);
    }

    #[test]
    fn commit_then_evaluate_continues(value in json_value_strategy(2), approved in any::<bool>()) {
        let doc = resource(&value, json!({"approved": approved, "currentHash": "stale"}));
        let outcome = evaluate(&doc, &config()).unwrap();
        let committed = commit(&doc, &config(), &outcome.current_hash).unwrap();
        prop_assert_eq!(&committed, &commit(&committed, &config(), &outcome.current_hash).unwrap());

        let next = evaluate(&committed, &config()).unwrap();
        prop_assert!(!next.approved);
        prop_assert_eq!(next.decision, GateDecision::Continue);
        prop_assert_eq!(&committed["spec"], &doc["spec"]);
    }
}
