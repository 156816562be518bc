// crates/approval-gate-core/src/core/error.rs
// ============================================================================
// Module: Approval Gate Errors
// Description: Error taxonomy for gate evaluation and status commits.
// Purpose: Give every terminal failure a stable kind and descriptive message.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every [`GateError`] is terminal for the invocation that raised it. Callers
//! surface the error text as a fatal result and skip the status commit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::path::PathError;

// ============================================================================
// SECTION: Gate Errors
// ============================================================================

/// Errors raised while evaluating the gate or committing status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// Configuration is malformed (path shape, unknown algorithm, empty fields).
    #[error("invalid gate config: {0}")]
    InvalidConfig(String),
    /// The monitored field or one of its parent sections is missing.
    #[error("{0}")]
    FieldNotFound(String),
    /// A field exists but holds the wrong value type.
    #[error("{0}")]
    TypeMismatch(String),
    /// The monitored value could not be canonicalized for hashing.
    #[error("cannot serialize monitored value: {0}")]
    SerializationFailure(String),
}

impl GateError {
    /// Returns a stable snake_case label for logs and audit records.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "invalid_config",
            Self::FieldNotFound(_) => "field_not_found",
            Self::TypeMismatch(_) => "type_mismatch",
            Self::SerializationFailure(_) => "serialization_failure",
        }
    }
}

impl From<PathError> for GateError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::Empty => Self::InvalidConfig(err.to_string()),
            PathError::NotAMapping {
                ..
            } => Self::TypeMismatch(err.to_string()),
        }
    }
}
