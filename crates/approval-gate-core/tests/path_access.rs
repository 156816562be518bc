// crates/approval-gate-core/tests/path_access.rs
// ============================================================================
// Module: Path Access Tests
// Description: Tests for dot-path parsing and nested get/set.
// ============================================================================
//! ## Overview
//! Validates auto-vivification, not-found reporting, and type mismatches.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

use approval_gate_core::Document;
use approval_gate_core::FieldPath;
use approval_gate_core::PathError;
use approval_gate_core::get_path;
use approval_gate_core::set_path;
use serde_json::Value;
use serde_json::json;

fn document(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

#[test]
fn parse_drops_empty_segments() {
    let path = FieldPath::parse(".spec..resources.").unwrap();
    assert_eq!(path.segments(), ["spec", "resources"]);
    assert_eq!(path.to_string(), "spec.resources");
}

#[test]
fn parse_rejects_paths_without_segments() {
    assert_eq!(FieldPath::parse("").unwrap_err(), PathError::Empty);
    assert_eq!(FieldPath::parse("...").unwrap_err(), PathError::Empty);
}

#[test]
fn split_section_requires_two_segments() {
    let path: FieldPath = "spec.a.b.c".parse().unwrap();
    let (section, field) = path.split_section().unwrap();
    assert_eq!(section, "spec");
    assert_eq!(field.to_string(), "a.b.c");

    assert!(FieldPath::parse("spec").unwrap().split_section().is_none());
}

#[test]
fn relative_to_strips_only_a_leading_root() {
    let approved = FieldPath::parse("status.approved").unwrap();
    assert_eq!(approved.relative_to("status").to_string(), "approved");

    let bare = FieldPath::parse("approved").unwrap();
    assert_eq!(bare.relative_to("status").to_string(), "approved");

    let nested = FieldPath::parse("gate.status.approved").unwrap();
    assert_eq!(nested.relative_to("status").to_string(), "gate.status.approved");

    let root_only = FieldPath::parse("status").unwrap();
    assert_eq!(root_only.relative_to("status").to_string(), "status");
}

// ============================================================================
// SECTION: Get
// ============================================================================

#[test]
fn get_reads_nested_values() {
    let doc = document(json!({"spec": {"resources": {"cpu": 2}}}));
    let path = FieldPath::parse("spec.resources.cpu").unwrap();
    assert_eq!(get_path(&doc, &path), Some(&json!(2)));
}

#[test]
fn get_reports_missing_without_error() {
    let doc = document(json!({"spec": {"resources": "flat"}}));
    let missing = FieldPath::parse("spec.other").unwrap();
    let through_scalar = FieldPath::parse("spec.resources.cpu").unwrap();
    assert_eq!(get_path(&doc, &missing), None);
    assert_eq!(get_path(&doc, &through_scalar), None);
}

#[test]
fn get_returns_explicit_null() {
    let doc = document(json!({"spec": {"resources": null}}));
    let path = FieldPath::parse("spec.resources").unwrap();
    assert_eq!(get_path(&doc, &path), Some(&Value::Null));
}

// ============================================================================
// SECTION: Set
// ============================================================================

#[test]
fn set_creates_missing_intermediate_maps() {
    let mut doc = Document::new();
    let path = FieldPath::parse("gate.tracking.hash").unwrap();
    set_path(&mut doc, &path, json!("abc")).unwrap();
    assert_eq!(Value::Object(doc), json!({"gate": {"tracking": {"hash": "abc"}}}));
}

#[test]
fn set_overwrites_leaf_and_keeps_siblings() {
    let mut doc = document(json!({"approved": true, "other": 1}));
    let path = FieldPath::parse("approved").unwrap();
    set_path(&mut doc, &path, json!(false)).unwrap();
    assert_eq!(Value::Object(doc), json!({"approved": false, "other": 1}));
}

#[test]
fn set_rejects_non_map_intermediate() {
    let mut doc = document(json!({"gate": "scalar"}));
    let path = FieldPath::parse("gate.hash").unwrap();
    let err = set_path(&mut doc, &path, json!("abc")).unwrap_err();
    assert_eq!(
        err,
        PathError::NotAMapping {
            segment: "gate".to_string(),
        }
    );
    assert_eq!(err.to_string(), "key \"gate\" exists but is not a map");
    assert_eq!(Value::Object(doc), json!({"gate": "scalar"}));
}
