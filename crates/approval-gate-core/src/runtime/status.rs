// crates/approval-gate-core/src/runtime/status.rs
// ============================================================================
// Module: Status Commit
// Description: Writes the approved hash and resets the approval flag.
// Purpose: Make each approval single-use once the gate passes.
// Dependencies: serde_json, crate::core
// ============================================================================

//! ## Overview
//! Only the two configured status fields change. Everything else in the
//! document, including unrelated status fields, is copied through.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;

use crate::core::Document;
use crate::core::GateConfig;
use crate::core::GateError;
use crate::core::STATUS_SECTION;
use crate::core::set_path;

// ============================================================================
// SECTION: Commit
// ============================================================================

/// Returns a copy of `document` with `current_hash` committed and the
/// approval flag reset to `false`.
///
/// # Errors
///
/// Returns [`GateError::TypeMismatch`] when `status` or an intermediate
/// segment of either status path exists but is not an object. No partial
/// document is returned.
pub fn commit(
    document: &Document,
    config: &GateConfig,
    current_hash: &str,
) -> Result<Document, GateError> {
    let mut updated = document.clone();
    let status = updated
        .entry(STATUS_SECTION.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if status.is_null() {
        *status = Value::Object(Map::new());
    }
    let Value::Object(status) = status else {
        return Err(GateError::TypeMismatch(format!("{STATUS_SECTION} is not a map")));
    };
    set_path(status, &config.current_hash_in_status(), Value::String(current_hash.to_string()))?;
    set_path(status, &config.approval_flag_in_status(), Value::Bool(false))?;
    Ok(updated)
}
