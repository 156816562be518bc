// crates/approval-gate-core/src/core/config.rs
// ============================================================================
// Module: Approval Gate Configuration
// Description: Raw wire input and the resolved, immutable gate configuration.
// Purpose: Apply defaults once and reject malformed paths before evaluation.
// Dependencies: serde, crate::core::{hashing, path}
// ============================================================================

//! ## Overview
//! [`RawGateConfig`] mirrors the camelCase input object a pipeline hands to the
//! gate; every field except `dataField` is optional. [`RawGateConfig::resolve`]
//! is the only way to build a [`GateConfig`], so evaluation never sees an
//! unset field or a monitored path with fewer than two segments.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::error::GateError;
use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::HashAlgorithm;
use crate::core::path::FieldPath;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Top-level document section that holds gate-owned state.
pub const STATUS_SECTION: &str = "status";
/// Default path of the approval flag.
pub const DEFAULT_APPROVAL_FLAG_PATH: &str = "status.approved";
/// Default path of the last approved hash.
pub const DEFAULT_CURRENT_HASH_PATH: &str = "status.currentHash";
/// Default human message when approval is required.
pub const DEFAULT_APPROVAL_MESSAGE: &str = "Changes detected. Approval required.";
/// Default for embedding hashes and instructions in halt messages.
pub const DEFAULT_INCLUDE_DETAIL: bool = true;

// ============================================================================
// SECTION: Raw Input
// ============================================================================

/// Gate input as supplied by the caller, before defaults are applied.
///
/// Unknown keys (`apiVersion`, `kind`, legacy fields) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGateConfig {
    /// Dot path of the monitored subtree, e.g. `spec.resources`.
    #[serde(default)]
    pub data_field: String,
    /// Dot path of the approval flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_field: Option<String>,
    /// Dot path of the last approved hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_hash_field: Option<String>,
    /// Whether halt messages embed hashes and approval instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_condition: Option<bool>,
    /// Base message shown when approval is required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_message: Option<String>,
    /// Hash algorithm label (`sha256` or `sha512`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_algorithm: Option<String>,
}

impl RawGateConfig {
    /// Creates raw input monitoring `data_field` with every other field defaulted.
    #[must_use]
    pub fn for_path(data_field: impl Into<String>) -> Self {
        Self {
            data_field: data_field.into(),
            ..Self::default()
        }
    }

    /// Applies defaults and validates the input.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidConfig`] when a path is empty, the monitored
    /// path has fewer than two segments, one status path equals or contains the other,
    /// or the hash algorithm is unknown.
    pub fn resolve(self) -> Result<GateConfig, GateError> {
        let monitored_path = parse_monitored_path(&self.data_field)?;
        let approval_flag_path = parse_status_path(
            "approvalField",
            self.approval_field.as_deref().unwrap_or(DEFAULT_APPROVAL_FLAG_PATH),
        )?;
        let current_hash_path = parse_status_path(
            "currentHashField",
            self.current_hash_field.as_deref().unwrap_or(DEFAULT_CURRENT_HASH_PATH),
        )?;
        let flag_in_status = approval_flag_path.relative_to(STATUS_SECTION);
        let hash_in_status = current_hash_path.relative_to(STATUS_SECTION);
        if flag_in_status.segments().starts_with(hash_in_status.segments())
            || hash_in_status.segments().starts_with(flag_in_status.segments())
        {
            return Err(GateError::InvalidConfig(format!(
                "approvalField {approval_flag_path} and currentHashField {current_hash_path} \
                 overlap within {STATUS_SECTION}"
            )));
        }
        let hash_algorithm = match self.hash_algorithm.as_deref() {
            None => DEFAULT_HASH_ALGORITHM,
            Some(label) => label
                .parse::<HashAlgorithm>()
                .map_err(|err| GateError::InvalidConfig(err.to_string()))?,
        };
        Ok(GateConfig {
            monitored_path,
            approval_flag_path,
            current_hash_path,
            include_detail: self.detailed_condition.unwrap_or(DEFAULT_INCLUDE_DETAIL),
            approval_message: self
                .approval_message
                .unwrap_or_else(|| DEFAULT_APPROVAL_MESSAGE.to_string()),
            hash_algorithm,
        })
    }
}

// ============================================================================
// SECTION: Resolved Config
// ============================================================================

/// Fully resolved, immutable gate configuration.
///
/// # Invariants
/// - `monitored_path` has at least two segments.
/// - Approval flag and current hash paths are distinct within `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Monitored subtree path.
    monitored_path: FieldPath,
    /// Approval flag path as configured.
    approval_flag_path: FieldPath,
    /// Approved hash path as configured.
    current_hash_path: FieldPath,
    /// Embed hashes and instructions in halt messages.
    include_detail: bool,
    /// Base halt message.
    approval_message: String,
    /// Content hash algorithm.
    hash_algorithm: HashAlgorithm,
}

impl GateConfig {
    /// Returns the monitored subtree path.
    #[must_use]
    pub const fn monitored_path(&self) -> &FieldPath {
        &self.monitored_path
    }

    /// Returns the approval flag path as configured.
    #[must_use]
    pub const fn approval_flag_path(&self) -> &FieldPath {
        &self.approval_flag_path
    }

    /// Returns the approved hash path as configured.
    #[must_use]
    pub const fn current_hash_path(&self) -> &FieldPath {
        &self.current_hash_path
    }

    /// Returns the approval flag path relative to the status section.
    #[must_use]
    pub fn approval_flag_in_status(&self) -> FieldPath {
        self.approval_flag_path.relative_to(STATUS_SECTION)
    }

    /// Returns the approved hash path relative to the status section.
    #[must_use]
    pub fn current_hash_in_status(&self) -> FieldPath {
        self.current_hash_path.relative_to(STATUS_SECTION)
    }

    /// Returns whether halt messages carry hashes and instructions.
    #[must_use]
    pub const fn include_detail(&self) -> bool {
        self.include_detail
    }

    /// Returns the base halt message.
    #[must_use]
    pub fn approval_message(&self) -> &str {
        &self.approval_message
    }

    /// Returns the content hash algorithm.
    #[must_use]
    pub const fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses the monitored path and enforces the section.field shape.
fn parse_monitored_path(raw: &str) -> Result<FieldPath, GateError> {
    let invalid = || {
        GateError::InvalidConfig(format!(
            "invalid dataField format: \"{raw}\", expected section.field (e.g. spec.resources)"
        ))
    };
    let path = FieldPath::parse(raw).map_err(|_| invalid())?;
    if path.split_section().is_none() {
        return Err(invalid());
    }
    Ok(path)
}

/// Parses a status field path.
fn parse_status_path(field: &str, raw: &str) -> Result<FieldPath, GateError> {
    FieldPath::parse(raw)
        .map_err(|err| GateError::InvalidConfig(format!("{field} \"{raw}\" is invalid: {err}")))
}
