// crates/approval-gate-core/src/runtime/pipeline.rs
// ============================================================================
// Module: Approval Gate Pipeline Step
// Description: Observed/desired reconciliation around evaluate, render, commit.
// Purpose: Provide a single request/response entry point for pipeline hosts.
// Dependencies: serde, serde_json, crate::{audit, core, runtime}
// ============================================================================

//! ## Overview
//! A pipeline host hands the gate the observed resource (last known good) and
//! the desired resource (proposed). The gate:
//! - carries identity (`apiVersion`, `kind`, `metadata.name`) into a desired
//!   resource that has no kind yet;
//! - uses the desired status when it is a non-empty object and falls back to
//!   the observed status otherwise; a status that is not a map counts as
//!   empty and is dropped, so an unreadable status halts for approval;
//! - hashes the monitored subtree of the desired resource;
//! - on halt or error returns the observed resource with the effective status;
//! - on continue returns the desired resource with the committed status.
//!
//! The request context is returned untouched. Each call records one audit event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::audit::GateAuditEvent;
use crate::audit::GateAuditSink;
use crate::audit::NoopAuditSink;
use crate::core::Condition;
use crate::core::Document;
use crate::core::GateConfig;
use crate::core::GateDecision;
use crate::core::GateError;
use crate::core::GateOutcome;
use crate::core::GateResult;
use crate::core::STATUS_SECTION;
use crate::core::Severity;
use crate::runtime::evaluator::evaluate;
use crate::runtime::render::DownstreamAction;
use crate::runtime::render::render;
use crate::runtime::status::commit;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Resource API version key.
const API_VERSION_KEY: &str = "apiVersion";
/// Resource kind key.
const KIND_KEY: &str = "kind";
/// Resource metadata key.
const METADATA_KEY: &str = "metadata";
/// Resource name key within metadata.
const NAME_KEY: &str = "name";

// ============================================================================
// SECTION: Request / Response
// ============================================================================

/// Input for one gate invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GateRequest {
    /// Last known good resource.
    #[serde(default)]
    pub observed: Document,
    /// Proposed resource.
    #[serde(default)]
    pub desired: Document,
    /// Opaque pipeline context, passed through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

/// Output of one gate invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResponse {
    /// Resource the host should apply downstream.
    pub desired: Document,
    /// Conditions to attach to the resource.
    pub conditions: Vec<Condition>,
    /// Pipeline results; a fatal result stops downstream steps.
    pub results: Vec<GateResult>,
    /// Pipeline context from the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    /// Evaluated outcome, absent when evaluation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<GateOutcome>,
}

impl GateResponse {
    /// Returns the gate decision, or `None` when evaluation failed.
    #[must_use]
    pub fn decision(&self) -> Option<GateDecision> {
        self.outcome.as_ref().map(|outcome| outcome.decision)
    }

    /// Returns true when any result is fatal.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.results.iter().any(|result| result.severity == Severity::Fatal)
    }
}

// ============================================================================
// SECTION: Approval Gate
// ============================================================================

/// Approval gate bound to one resolved config and an audit sink.
pub struct ApprovalGate {
    /// Resolved gate configuration.
    config: GateConfig,
    /// Audit sink for decision records.
    audit: Arc<dyn GateAuditSink>,
}

impl ApprovalGate {
    /// Creates a gate that discards audit events.
    #[must_use]
    pub fn new(config: GateConfig) -> Self {
        Self::with_audit(config, Arc::new(NoopAuditSink))
    }

    /// Creates a gate with the provided audit sink.
    #[must_use]
    pub fn with_audit(config: GateConfig, audit: Arc<dyn GateAuditSink>) -> Self {
        Self {
            config,
            audit,
        }
    }

    /// Returns the gate configuration.
    #[must_use]
    pub const fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Runs the gate for one request.
    #[must_use]
    pub fn run(&self, request: GateRequest) -> GateResponse {
        let GateRequest {
            observed,
            desired,
            context,
        } = request;
        let status = effective_status(&observed, &desired);
        let mut proposed = desired;
        adopt_identity(&observed, &mut proposed);
        let proposed = with_status(proposed, &status);
        let last_known_good = with_status(observed, &status);

        let outcome = match evaluate(&proposed, &self.config) {
            Ok(outcome) => outcome,
            Err(err) => return self.failure(&err, last_known_good, context),
        };
        let rendered = render(&outcome, &self.config);
        let desired = match rendered.action {
            DownstreamAction::RestoreLastKnownGood => last_known_good,
            DownstreamAction::CommitStatus => {
                match commit(&proposed, &self.config, &outcome.current_hash) {
                    Ok(committed) => committed,
                    Err(err) => return self.failure(&err, last_known_good, context),
                }
            }
        };
        self.audit.record(&GateAuditEvent::decision(&self.config, &outcome));
        GateResponse {
            desired,
            conditions: vec![rendered.condition],
            results: rendered.fatal.into_iter().collect(),
            context,
            outcome: Some(outcome),
        }
    }

    /// Builds the fatal response for a terminal error.
    fn failure(
        &self,
        error: &GateError,
        last_known_good: Document,
        context: Option<Value>,
    ) -> GateResponse {
        self.audit.record(&GateAuditEvent::failure(&self.config, error));
        GateResponse {
            desired: last_known_good,
            conditions: Vec::new(),
            results: vec![GateResult::fatal(error.to_string())],
            context,
            outcome: None,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Picks the desired status when populated, else the observed status.
fn effective_status(observed: &Document, desired: &Document) -> Map<String, Value> {
    match desired.get(STATUS_SECTION) {
        Some(Value::Object(status)) if !status.is_empty() => status.clone(),
        _ => match observed.get(STATUS_SECTION) {
            Some(Value::Object(status)) => status.clone(),
            _ => Map::new(),
        },
    }
}

/// Replaces the status of `document` when `status` is non-empty; otherwise
/// drops a status that is not a map.
fn with_status(mut document: Document, status: &Map<String, Value>) -> Document {
    if !status.is_empty() {
        document.insert(STATUS_SECTION.to_string(), Value::Object(status.clone()));
    } else if document.get(STATUS_SECTION).is_some_and(|value| !value.is_object()) {
        document.remove(STATUS_SECTION);
    }
    document
}

/// Copies identity fields from the observed resource into a kindless desired resource.
fn adopt_identity(observed: &Document, desired: &mut Document) {
    let kind = desired.get(KIND_KEY).and_then(Value::as_str).unwrap_or_default();
    if !kind.is_empty() {
        return;
    }
    for key in [API_VERSION_KEY, KIND_KEY] {
        if let Some(value) = observed.get(key) {
            desired.insert(key.to_string(), value.clone());
        }
    }
    let name = observed.get(METADATA_KEY).and_then(|metadata| metadata.get(NAME_KEY)).cloned();
    if let Some(name) = name {
        let metadata = desired
            .entry(METADATA_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(metadata) = metadata {
            metadata.insert(NAME_KEY.to_string(), name);
        }
    }
}
