// crates/approval-gate-core/tests/audit_sinks.rs
// ============================================================================
// Module: Audit Sink Tests
// Description: Tests for JSON-lines audit output.
// ============================================================================
//! ## Overview
//! Confirms file sinks append one parseable record per gate run.

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

use std::sync::Arc;

use approval_gate_core::ApprovalGate;
use approval_gate_core::FileAuditSink;
use approval_gate_core::GateAuditEvent;
use approval_gate_core::GateAuditSink;
use approval_gate_core::GateError;
use approval_gate_core::GateRequest;
use approval_gate_core::RawGateConfig;
use serde_json::Value;
use serde_json::json;

fn request(resources: &Value) -> GateRequest {
    serde_json::from_value(json!({
        "observed": {"spec": {"resources": resources}},
        "desired": {"spec": {"resources": resources}}
    }))
    .unwrap()
}

#[test]
fn file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let sink = Arc::new(FileAuditSink::new(&path).unwrap());
    let config = RawGateConfig::for_path("spec.resources").resolve().unwrap();
    let gate = ApprovalGate::with_audit(config, sink);

    let _ = gate.run(request(&json!({"test": "data"})));
    let _ = gate.run(serde_json::from_value(json!({"desired": {"spec": {}}})).unwrap());

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> =
        contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], json!("gate_decision"));
    assert_eq!(lines[0]["decision"], json!("halt"));
    assert_eq!(lines[0]["monitored_path"], json!("spec.resources"));
    assert_eq!(lines[1]["event"], json!("gate_error"));
    assert_eq!(lines[1]["error_kind"], json!("field_not_found"));
}

#[test]
fn file_sink_keeps_existing_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    std::fs::write(&path, "previous\n").unwrap();

    let config = RawGateConfig::for_path("spec.resources").resolve().unwrap();
    let sink = FileAuditSink::new(&path).unwrap();
    let error = GateError::InvalidConfig("bad".to_string());
    sink.record(&GateAuditEvent::failure(&config, &error));

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("previous\n"));
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn file_sink_fails_for_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("audit.jsonl");
    assert!(FileAuditSink::new(&path).is_err());
}
