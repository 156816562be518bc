// crates/approval-gate-core/src/core/outcome.rs
// ============================================================================
// Module: Approval Gate Outcomes
// Description: Gate decisions, conditions, and pipeline result records.
// Purpose: Provide serializable records for the decision and its outward signals.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`GateOutcome`] captures what the evaluator saw and decided. Conditions
//! and results are the outward-facing records a pipeline runtime attaches to
//! the resource and to its own run log.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Condition Labels
// ============================================================================

/// Condition type emitted while waiting for approval.
pub const CONDITION_APPROVAL_REQUIRED: &str = "ApprovalRequired";
/// Condition reason emitted while waiting for approval.
pub const REASON_WAITING_FOR_APPROVAL: &str = "WaitingForApproval";
/// Condition type emitted when the gate passes.
pub const CONDITION_FUNCTION_SUCCESS: &str = "FunctionSuccess";
/// Condition reason emitted when the gate passes.
pub const REASON_SUCCESS: &str = "Success";
/// Condition message emitted when the gate passes.
pub const APPROVED_MESSAGE: &str = "Approved successfully";

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Gate decision for a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    /// Downstream processing may proceed.
    Continue,
    /// Downstream processing must stop until approval is granted.
    Halt,
}

impl GateDecision {
    /// Applies the gate rule: halt iff not approved and the hash is new or changed.
    #[must_use]
    pub fn decide(approved: bool, stored_hash: &str, current_hash: &str) -> Self {
        if !approved && (stored_hash.is_empty() || stored_hash != current_hash) {
            Self::Halt
        } else {
            Self::Continue
        }
    }

    /// Returns the lowercase label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Halt => "halt",
        }
    }
}

/// Result of evaluating the gate against one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateOutcome {
    /// Hash of the monitored subtree as it is now.
    pub current_hash: String,
    /// Last approved hash, empty when never approved.
    pub stored_hash: String,
    /// Approval flag value (false when absent).
    pub approved: bool,
    /// Gate decision.
    pub decision: GateDecision,
}

// ============================================================================
// SECTION: Conditions
// ============================================================================

/// Resources a condition is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTarget {
    /// Composite resource only.
    Composite,
    /// Composite resource and its claim.
    CompositeAndClaim,
}

/// Structured condition record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Condition type, e.g. `ApprovalRequired`.
    #[serde(rename = "type")]
    pub condition_type: String,
    /// Condition state.
    pub status: bool,
    /// Machine-readable reason.
    pub reason: String,
    /// Human-readable message.
    pub message: String,
    /// Resources the condition applies to.
    pub target: ConditionTarget,
}

impl Condition {
    /// Condition reported while waiting for approval.
    #[must_use]
    pub fn approval_required(message: impl Into<String>) -> Self {
        Self {
            condition_type: CONDITION_APPROVAL_REQUIRED.to_string(),
            status: false,
            reason: REASON_WAITING_FOR_APPROVAL.to_string(),
            message: message.into(),
            target: ConditionTarget::CompositeAndClaim,
        }
    }

    /// Condition reported when the gate passes.
    #[must_use]
    pub fn function_success() -> Self {
        Self {
            condition_type: CONDITION_FUNCTION_SUCCESS.to_string(),
            status: true,
            reason: REASON_SUCCESS.to_string(),
            message: APPROVED_MESSAGE.to_string(),
            target: ConditionTarget::CompositeAndClaim,
        }
    }
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Severity of a pipeline result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational.
    Normal,
    /// Non-fatal problem.
    Warning,
    /// Stops every downstream step.
    Fatal,
}

/// Pipeline result record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateResult {
    /// Result severity.
    pub severity: Severity,
    /// Result message.
    pub message: String,
}

impl GateResult {
    /// Creates a fatal result.
    #[must_use]
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Fatal,
            message: message.into(),
        }
    }
}
