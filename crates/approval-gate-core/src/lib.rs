// crates/approval-gate-core/src/lib.rs
// ============================================================================
// Module: Approval Gate Core Library
// Description: Public API surface for the approval gate.
// Purpose: Expose core types, the runtime state machine, and audit sinks.
// Dependencies: crate::{audit, core, runtime}
// ============================================================================

//! ## Overview
//! Approval gate core detects changes to a monitored subtree of a resource
//! document and halts downstream processing until the change is approved.
//! The approved hash and the approval flag live in the document's own status
//! section, so the engine keeps no state between invocations.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use audit::FileAuditSink;
pub use audit::GateAuditEvent;
pub use audit::GateAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use runtime::ApprovalGate;
pub use runtime::DownstreamAction;
pub use runtime::GateRequest;
pub use runtime::GateResponse;
pub use runtime::RenderedDecision;
pub use runtime::commit;
pub use runtime::evaluate;
pub use runtime::render;
