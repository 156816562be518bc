// crates/approval-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Approval Gate Runtime
// Description: Evaluation, rendering, status commit, and the pipeline step.
// Purpose: Group the gate state machine behind a small public surface.
// Dependencies: crate::{audit, core}
// ============================================================================

//! ## Overview
//! The runtime is synchronous and stateless across calls. All durable state
//! lives in the status section of the caller's document.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod evaluator;
pub mod pipeline;
pub mod render;
pub mod status;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use evaluator::evaluate;
pub use evaluator::monitored_hash;
pub use pipeline::ApprovalGate;
pub use pipeline::GateRequest;
pub use pipeline::GateResponse;
pub use render::DownstreamAction;
pub use render::RenderedDecision;
pub use render::halt_message;
pub use render::render;
pub use status::commit;
