// crates/approval-gate-core/src/runtime/render.rs
// ============================================================================
// Module: Decision Rendering
// Description: Maps gate outcomes to conditions, fatal results, and actions.
// Purpose: Keep the outward signal policy separate from evaluation.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! A halt produces an `ApprovalRequired` condition and a fatal result with the
//! same message, and tells the caller to fall back to its last known good
//! output. A pass produces `FunctionSuccess` and tells the caller to commit
//! the new hash into status.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::Condition;
use crate::core::GateConfig;
use crate::core::GateDecision;
use crate::core::GateOutcome;
use crate::core::GateResult;

// ============================================================================
// SECTION: Types
// ============================================================================

/// What the caller must do with its proposed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DownstreamAction {
    /// Commit the new hash and reset the approval flag, then pass through.
    CommitStatus,
    /// Discard the proposed output and emit the last known good output.
    RestoreLastKnownGood,
}

/// Outward signals for one gate outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDecision {
    /// Condition to attach to the resource.
    pub condition: Condition,
    /// Fatal result that stops downstream steps, present only on halt.
    pub fatal: Option<GateResult>,
    /// Required downstream action.
    pub action: DownstreamAction,
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the outward signals for `outcome`.
#[must_use]
pub fn render(outcome: &GateOutcome, config: &GateConfig) -> RenderedDecision {
    match outcome.decision {
        GateDecision::Halt => {
            let message = halt_message(outcome, config);
            RenderedDecision {
                condition: Condition::approval_required(message.clone()),
                fatal: Some(GateResult::fatal(message)),
                action: DownstreamAction::RestoreLastKnownGood,
            }
        }
        GateDecision::Continue => RenderedDecision {
            condition: Condition::function_success(),
            fatal: None,
            action: DownstreamAction::CommitStatus,
        },
    }
}

/// Builds the halt message, with hashes and instructions when detail is enabled.
#[must_use]
pub fn halt_message(outcome: &GateOutcome, config: &GateConfig) -> String {
    let base = config.approval_message();
    if !config.include_detail() {
        return base.to_string();
    }
    format!(
        "{base}\nCurrent hash: {current}\nApproved hash: {stored}\nApprove this change by \
         setting {flag} to true",
        current = outcome.current_hash,
        stored = outcome.stored_hash,
        flag = config.approval_flag_path(),
    )
}
