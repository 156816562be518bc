// crates/approval-gate-core/tests/config_resolution.rs
// ============================================================================
// Module: Gate Config Resolution Tests
// Description: Tests for defaulting and validation of raw gate input.
// ============================================================================
//! ## Overview
//! Ensures defaults are applied once and malformed input fails closed.

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

use approval_gate_core::DEFAULT_APPROVAL_MESSAGE;
use approval_gate_core::GateError;
use approval_gate_core::HashAlgorithm;
use approval_gate_core::RawGateConfig;
use serde_json::json;

#[test]
fn defaults_are_applied() {
    let config = RawGateConfig::for_path("spec.resources").resolve().unwrap();
    assert_eq!(config.monitored_path().to_string(), "spec.resources");
    assert_eq!(config.approval_flag_path().to_string(), "status.approved");
    assert_eq!(config.current_hash_path().to_string(), "status.currentHash");
    assert_eq!(config.approval_flag_in_status().to_string(), "approved");
    assert_eq!(config.current_hash_in_status().to_string(), "currentHash");
    assert!(config.include_detail());
    assert_eq!(config.approval_message(), DEFAULT_APPROVAL_MESSAGE);
    assert_eq!(config.hash_algorithm(), HashAlgorithm::Sha256);
}

#[test]
fn wire_input_uses_camel_case_and_ignores_unknown_keys() {
    let raw: RawGateConfig = serde_json::from_value(json!({
        "apiVersion": "approve.fn.crossplane.io/v1alpha1",
        "kind": "Input",
        "dataField": "spec.resources",
        "approvalField": "status.review.approved",
        "currentHashField": "status.review.hash",
        "oldHashField": "status.oldHash",
        "detailedCondition": false,
        "approvalMessage": "Needs review",
        "hashAlgorithm": "sha512"
    }))
    .unwrap();
    let config = raw.resolve().unwrap();
    assert_eq!(config.approval_flag_in_status().to_string(), "review.approved");
    assert_eq!(config.current_hash_in_status().to_string(), "review.hash");
    assert!(!config.include_detail());
    assert_eq!(config.approval_message(), "Needs review");
    assert_eq!(config.hash_algorithm(), HashAlgorithm::Sha512);
}

#[test]
fn monitored_path_needs_section_and_field() {
    for data_field in ["", "spec", "..spec.."] {
        let err = RawGateConfig::for_path(data_field).resolve().unwrap_err();
        assert!(matches!(err, GateError::InvalidConfig(_)), "{data_field}: {err}");
        assert!(err.to_string().contains("expected section.field"));
    }
}

#[test]
fn deep_monitored_paths_are_accepted() {
    let config = RawGateConfig::for_path("spec.a.b.c").resolve().unwrap();
    assert_eq!(config.monitored_path().segments().len(), 4);
}

#[test]
fn empty_status_paths_are_rejected() {
    let raw = RawGateConfig {
        approval_field: Some(".".to_string()),
        ..RawGateConfig::for_path("spec.resources")
    };
    let err = raw.resolve().unwrap_err();
    assert!(err.to_string().contains("approvalField"));
}

#[test]
fn colliding_status_paths_are_rejected() {
    for (approval, hash) in [
        ("status.gate", "gate"),
        ("status.gate", "status.gate.hash"),
        ("gate.review.approved", "status.gate"),
    ] {
        let raw = RawGateConfig {
            approval_field: Some(approval.to_string()),
            current_hash_field: Some(hash.to_string()),
            ..RawGateConfig::for_path("spec.resources")
        };
        let err = raw.resolve().unwrap_err();
        assert_eq!(err.kind(), "invalid_config", "{approval} / {hash}");
        assert!(err.to_string().contains("overlap within status"));
    }
}

#[test]
fn sibling_status_paths_are_accepted() {
    let raw = RawGateConfig {
        approval_field: Some("status.gate.approved".to_string()),
        current_hash_field: Some("status.gate.hash".to_string()),
        ..RawGateConfig::for_path("spec.resources")
    };
    let config = raw.resolve().unwrap();
    assert_eq!(config.approval_flag_in_status().to_string(), "gate.approved");
    assert_eq!(config.current_hash_in_status().to_string(), "gate.hash");
}

#[test]
fn unknown_hash_algorithm_is_rejected() {
    let raw = RawGateConfig {
        hash_algorithm: Some("md5".to_string()),
        ..RawGateConfig::for_path("spec.resources")
    };
    let err = raw.resolve().unwrap_err();
    assert!(err.to_string().contains("unsupported hash algorithm: md5"));
}
