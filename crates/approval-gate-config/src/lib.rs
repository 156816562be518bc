// crates/approval-gate-config/src/lib.rs
// ============================================================================
// Module: Approval Gate Config Library
// Description: File configuration model and validation for the approval gate.
// Purpose: Single source of truth for approval-gate.toml semantics.
// Dependencies: approval-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `approval-gate-config` loads `approval-gate.toml`, validates the `[gate]`
//! and `[audit]` sections, and turns them into a resolved
//! [`approval_gate_core::GateConfig`] and an audit sink.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
