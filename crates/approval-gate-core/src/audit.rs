// crates/approval-gate-core/src/audit.rs
// ============================================================================
// Module: Gate Audit Logging
// Description: Structured audit events for gate decisions and failures.
// Purpose: Emit JSON-lines records without tying the core to a log backend.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every pipeline invocation records exactly one [`GateAuditEvent`]. Sinks
//! swallow their own I/O errors so logging can never change a decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::GateConfig;
use crate::core::GateError;
use crate::core::GateOutcome;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Gate audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Monitored subtree path.
    pub monitored_path: String,
    /// `continue`, `halt`, or `error`.
    pub decision: &'static str,
    /// Hash of the monitored subtree when computed.
    pub current_hash: Option<String>,
    /// Last approved hash when read.
    pub stored_hash: Option<String>,
    /// Approval flag when read.
    pub approved: Option<bool>,
    /// Error kind label on failure.
    pub error_kind: Option<&'static str>,
    /// Error text on failure.
    pub message: Option<String>,
}

impl GateAuditEvent {
    /// Creates an event for a completed decision.
    #[must_use]
    pub fn decision(config: &GateConfig, outcome: &GateOutcome) -> Self {
        Self {
            event: "gate_decision",
            timestamp_ms: now_ms(),
            monitored_path: config.monitored_path().to_string(),
            decision: outcome.decision.as_str(),
            current_hash: Some(outcome.current_hash.clone()),
            stored_hash: Some(outcome.stored_hash.clone()),
            approved: Some(outcome.approved),
            error_kind: None,
            message: None,
        }
    }

    /// Creates an event for a terminal failure.
    #[must_use]
    pub fn failure(config: &GateConfig, error: &GateError) -> Self {
        Self {
            event: "gate_error",
            timestamp_ms: now_ms(),
            monitored_path: config.monitored_path().to_string(),
            decision: "error",
            current_hash: None,
            stored_hash: None,
            approved: None,
            error_kind: Some(error.kind()),
            message: Some(error.to_string()),
        }
    }
}

/// Returns the current time in milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for gate events.
pub trait GateAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &GateAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl GateAuditSink for StderrAuditSink {
    fn record(&self, event: &GateAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl GateAuditSink for FileAuditSink {
    fn record(&self, event: &GateAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Audit sink that discards events.
pub struct NoopAuditSink;

impl GateAuditSink for NoopAuditSink {
    fn record(&self, _event: &GateAuditEvent) {}
}
