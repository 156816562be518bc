// crates/approval-gate-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Approval State Evaluation
// Description: Computes the monitored hash and applies the approve/halt rule.
// Purpose: Turn one document and one config into a deterministic gate outcome.
// Dependencies: serde_json, crate::core
// ============================================================================

//! ## Overview
//! Evaluation is a pure function of the document and config. The monitored
//! subtree must exist; the stored hash and approval flag are optional and
//! default to "never approved". Wrong value types are terminal errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::Document;
use crate::core::GateConfig;
use crate::core::GateDecision;
use crate::core::GateError;
use crate::core::GateOutcome;
use crate::core::STATUS_SECTION;
use crate::core::get_path;
use crate::core::hashing::hash_value;

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates the gate for `document`.
///
/// # Errors
///
/// - [`GateError::InvalidConfig`] when the monitored path is not `section.field`.
/// - [`GateError::FieldNotFound`] when the section or monitored field is absent.
/// - [`GateError::TypeMismatch`] when `status`, the stored hash, or the approval
///   flag has the wrong type.
/// - [`GateError::SerializationFailure`] when the monitored value cannot be hashed.
pub fn evaluate(document: &Document, config: &GateConfig) -> Result<GateOutcome, GateError> {
    let current_hash = monitored_hash(document, config)?;
    let status = status_section(document)?;
    let stored_hash = stored_hash(status, config)?;
    let approved = approval_flag(status, config)?;
    let decision = GateDecision::decide(approved, &stored_hash, &current_hash);
    Ok(GateOutcome {
        current_hash,
        stored_hash,
        approved,
        decision,
    })
}

/// Hashes the monitored subtree of `document`.
///
/// # Errors
///
/// Same as [`evaluate`] for the path and serialization cases.
pub fn monitored_hash(document: &Document, config: &GateConfig) -> Result<String, GateError> {
    let monitored_path = config.monitored_path();
    let (section_key, field_path) = monitored_path.split_section().ok_or_else(|| {
        GateError::InvalidConfig(format!(
            "invalid dataField format: \"{monitored_path}\", expected section.field"
        ))
    })?;
    let section = document.get(section_key).and_then(Value::as_object).ok_or_else(|| {
        GateError::FieldNotFound(format!("cannot get {section_key} from resource"))
    })?;
    let value = get_path(section, &field_path).ok_or_else(|| {
        GateError::FieldNotFound(format!("field {monitored_path} not found in resource"))
    })?;
    hash_value(config.hash_algorithm(), value)
        .map_err(|err| GateError::SerializationFailure(err.to_string()))
}

// ============================================================================
// SECTION: Status Reads
// ============================================================================

/// Returns the status object, or `None` when the document has no status.
fn status_section(document: &Document) -> Result<Option<&Document>, GateError> {
    match document.get(STATUS_SECTION) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(status)) => Ok(Some(status)),
        Some(_) => Err(GateError::TypeMismatch(format!("{STATUS_SECTION} is not a map"))),
    }
}

/// Reads the last approved hash; absence means never approved.
fn stored_hash(status: Option<&Document>, config: &GateConfig) -> Result<String, GateError> {
    let path = config.current_hash_in_status();
    match status.and_then(|status| get_path(status, &path)) {
        None => Ok(String::new()),
        Some(Value::String(hash)) => Ok(hash.clone()),
        Some(_) => {
            Err(GateError::TypeMismatch(format!("current hash field {path} is not a string")))
        }
    }
}

/// Reads the approval flag; absence means not approved.
fn approval_flag(status: Option<&Document>, config: &GateConfig) -> Result<bool, GateError> {
    let path = config.approval_flag_in_status();
    match status.and_then(|status| get_path(status, &path)) {
        None => Ok(false),
        Some(Value::Bool(approved)) => Ok(*approved),
        Some(_) => Err(GateError::TypeMismatch(format!("approval field {path} is not a boolean"))),
    }
}
