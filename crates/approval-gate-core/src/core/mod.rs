// crates/approval-gate-core/src/core/mod.rs
// ============================================================================
// Module: Approval Gate Core Types
// Description: Paths, hashing, configuration, errors, and outcome records.
// Purpose: Provide the typed building blocks the runtime evaluates over.
// Dependencies: serde, serde_json, serde_jcs, sha2, thiserror
// ============================================================================

//! ## Overview
//! Core types have no I/O and no shared state. Documents are plain
//! `serde_json` objects owned by the caller.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod config;
pub mod error;
pub mod hashing;
pub mod outcome;
pub mod path;

// ============================================================================
// SECTION: Document
// ============================================================================

/// Resource document: a JSON object with `spec`, `status`, and other sections.
pub type Document = serde_json::Map<String, serde_json::Value>;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::DEFAULT_APPROVAL_FLAG_PATH;
pub use config::DEFAULT_APPROVAL_MESSAGE;
pub use config::DEFAULT_CURRENT_HASH_PATH;
pub use config::DEFAULT_INCLUDE_DETAIL;
pub use config::GateConfig;
pub use config::RawGateConfig;
pub use config::STATUS_SECTION;
pub use error::GateError;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use outcome::Condition;
pub use outcome::ConditionTarget;
pub use outcome::GateDecision;
pub use outcome::GateOutcome;
pub use outcome::GateResult;
pub use outcome::Severity;
pub use path::FieldPath;
pub use path::PathError;
pub use path::get_path;
pub use path::set_path;
